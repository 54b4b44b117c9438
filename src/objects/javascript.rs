//! Document-level JavaScript.

use crate::fonts::encoding::encode_text_string;
use crate::object::{Dict, Object};
use crate::store::ObjectId;

/// The JavaScript name tree, with a single `EmbeddedJS` entry.
#[derive(Debug, Clone)]
pub struct EmbeddedJs {
    /// The Javascript action
    pub action: ObjectId,
}

impl EmbeddedJs {
    /// `<< /Names [(EmbeddedJS) n 0 R] >>`
    pub fn to_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert(
            "Names".into(),
            Object::Array(vec![Object::string("EmbeddedJS"), Object::reference(self.action)]),
        );
        Object::Dictionary(dict)
    }
}

/// A JavaScript action.
#[derive(Debug, Clone, Default)]
pub struct Javascript {
    /// Script source
    pub code: String,
}

impl Javascript {
    /// Append a script, one per line.
    pub fn append(&mut self, code: &str) {
        if !self.code.is_empty() {
            self.code.push('\n');
        }
        self.code.push_str(code);
    }

    /// `<< /S /JavaScript /JS (code) >>`
    pub fn to_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert("S".into(), Object::name("JavaScript"));
        dict.insert("JS".into(), Object::String(encode_text_string(&self.code)));
        Object::Dictionary(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ObjectSerializer;

    #[test]
    fn test_javascript_objects() {
        let s = ObjectSerializer::compact();
        let names = EmbeddedJs { action: 9 }.to_object();
        assert_eq!(s.serialize_to_string(&names), "<< /Names [(EmbeddedJS) 9 0 R] >>");

        let mut js = Javascript::default();
        js.append("this.print();");
        js.append("app.alert(1);");
        assert_eq!(
            s.serialize_to_string(&js.to_object()),
            "<< /S /JavaScript /JS (this.print\\(\\);\\napp.alert\\(1\\);) >>"
        );
    }
}
