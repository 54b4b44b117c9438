//! Document-level singletons: catalog, outlines, procset, info and viewer
//! preferences.

use indexmap::IndexMap;

use crate::fonts::encoding::encode_text_string;
use crate::object::{Dict, Object};
use crate::store::ObjectId;

/// The document catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Root of the page tree
    pub pages: ObjectId,
    /// Outline dictionary
    pub outlines: Option<ObjectId>,
    /// Destination shown when the document opens
    pub open_action: Option<ObjectId>,
    /// EmbeddedJS names dictionary
    pub javascript: Option<ObjectId>,
    /// Viewer preferences
    pub viewer_preferences: Option<ObjectId>,
}

impl Catalog {
    /// Catalog pointing at `pages`.
    pub fn new(pages: ObjectId) -> Self {
        Self {
            pages,
            outlines: None,
            open_action: None,
            javascript: None,
            viewer_preferences: None,
        }
    }

    /// Build the catalog dictionary.
    pub fn to_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert("Type".into(), Object::name("Catalog"));
        dict.insert("Pages".into(), Object::reference(self.pages));
        if let Some(id) = self.outlines {
            dict.insert("Outlines".into(), Object::reference(id));
        }
        if let Some(id) = self.open_action {
            dict.insert("OpenAction".into(), Object::reference(id));
        }
        if let Some(id) = self.javascript {
            let mut names = Dict::new();
            names.insert("JavaScript".into(), Object::reference(id));
            dict.insert("Names".into(), Object::Dictionary(names));
        }
        if let Some(id) = self.viewer_preferences {
            dict.insert("ViewerPreferences".into(), Object::reference(id));
        }
        Object::Dictionary(dict)
    }
}

/// Empty outline dictionary.
#[derive(Debug, Clone, Copy, Default)]
pub struct Outlines;

impl Outlines {
    /// `<< /Type /Outlines /Count 0 >>`
    pub fn to_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert("Type".into(), Object::name("Outlines"));
        dict.insert("Count".into(), Object::Integer(0));
        Object::Dictionary(dict)
    }
}

/// Procedure set array shared by all pages.
#[derive(Debug, Clone)]
pub struct Procset {
    names: Vec<String>,
}

impl Default for Procset {
    fn default() -> Self {
        Self {
            names: vec!["PDF".to_string(), "Text".to_string()],
        }
    }
}

impl Procset {
    /// Add a procedure set name once.
    pub fn add(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    /// Names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Build the procset array.
    pub fn to_object(&self) -> Object {
        Object::names(&self.names)
    }
}

/// Document information dictionary.
#[derive(Debug, Clone, Default)]
pub struct Info {
    entries: IndexMap<String, String>,
}

impl Info {
    /// Set an entry; an existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Value of an entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Build the info dictionary; non-ASCII values become UTF-16BE.
    pub fn to_object(&self) -> Object {
        let dict = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), Object::String(encode_text_string(v))))
            .collect();
        Object::Dictionary(dict)
    }
}

/// /NonFullScreenPageMode values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    UseNone,
    UseOutlines,
    UseThumbs,
    UseOC,
}

/// Reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    L2R,
    R2L,
}

/// /PrintScaling values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintScaling {
    None,
    AppDefault,
}

/// One viewer preference entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerPreference {
    HideToolbar(bool),
    HideMenubar(bool),
    HideWindowUi(bool),
    FitWindow(bool),
    CenterWindow(bool),
    DisplayDocTitle(bool),
    NonFullScreenPageMode(PageMode),
    Direction(Direction),
    PrintScaling(PrintScaling),
}

impl ViewerPreference {
    fn entry(&self) -> (&'static str, Object) {
        match *self {
            ViewerPreference::HideToolbar(v) => ("HideToolbar", Object::Boolean(v)),
            ViewerPreference::HideMenubar(v) => ("HideMenubar", Object::Boolean(v)),
            ViewerPreference::HideWindowUi(v) => ("HideWindowUI", Object::Boolean(v)),
            ViewerPreference::FitWindow(v) => ("FitWindow", Object::Boolean(v)),
            ViewerPreference::CenterWindow(v) => ("CenterWindow", Object::Boolean(v)),
            ViewerPreference::DisplayDocTitle(v) => ("DisplayDocTitle", Object::Boolean(v)),
            ViewerPreference::NonFullScreenPageMode(mode) => {
                let name = match mode {
                    PageMode::UseNone => "UseNone",
                    PageMode::UseOutlines => "UseOutlines",
                    PageMode::UseThumbs => "UseThumbs",
                    PageMode::UseOC => "UseOC",
                };
                ("NonFullScreenPageMode", Object::name(name))
            }
            ViewerPreference::Direction(dir) => {
                let name = match dir {
                    Direction::L2R => "L2R",
                    Direction::R2L => "R2L",
                };
                ("Direction", Object::name(name))
            }
            ViewerPreference::PrintScaling(scaling) => {
                let name = match scaling {
                    PrintScaling::None => "None",
                    PrintScaling::AppDefault => "AppDefault",
                };
                ("PrintScaling", Object::name(name))
            }
        }
    }
}

/// Viewer preferences dictionary.
#[derive(Debug, Clone, Default)]
pub struct ViewerPreferences {
    entries: Dict,
}

impl ViewerPreferences {
    /// Set a preference, replacing an earlier value for the same key.
    pub fn set(&mut self, preference: ViewerPreference) {
        let (key, value) = preference.entry();
        self.entries.insert(key.to_string(), value);
    }

    /// Build the preferences dictionary.
    pub fn to_object(&self) -> Object {
        Object::Dictionary(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ObjectSerializer;

    fn render(obj: &Object) -> String {
        ObjectSerializer::compact().serialize_to_string(obj)
    }

    #[test]
    fn test_catalog_minimal() {
        assert_eq!(
            render(&Catalog::new(3).to_object()),
            "<< /Type /Catalog /Pages 3 0 R >>"
        );
    }

    #[test]
    fn test_catalog_optional_entries() {
        let mut catalog = Catalog::new(3);
        catalog.outlines = Some(2);
        catalog.open_action = Some(12);
        catalog.javascript = Some(14);
        catalog.viewer_preferences = Some(15);
        assert_eq!(
            render(&catalog.to_object()),
            "<< /Type /Catalog /Pages 3 0 R /Outlines 2 0 R /OpenAction 12 0 R \
             /Names << /JavaScript 14 0 R >> /ViewerPreferences 15 0 R >>"
        );
    }

    #[test]
    fn test_procset_dedup() {
        let mut procset = Procset::default();
        procset.add("ImageC");
        procset.add("ImageC");
        assert_eq!(render(&procset.to_object()), "[/PDF /Text /ImageC]");
    }

    #[test]
    fn test_info_text_strings() {
        let mut info = Info::default();
        info.set("Producer", "pdf_scribe");
        info.set("Title", "Café");
        let obj = info.to_object();
        let dict = obj.as_dict().unwrap();
        assert_eq!(dict.get("Producer").and_then(Object::as_string), Some(&b"pdf_scribe"[..]));
        assert_eq!(
            dict.get("Title").and_then(Object::as_string),
            Some(&[0xFE, 0xFF, 0, b'C', 0, b'a', 0, b'f', 0, 0xE9][..])
        );
    }

    #[test]
    fn test_viewer_preferences() {
        let mut prefs = ViewerPreferences::default();
        prefs.set(ViewerPreference::HideToolbar(true));
        prefs.set(ViewerPreference::Direction(Direction::R2L));
        prefs.set(ViewerPreference::HideToolbar(false));
        assert_eq!(
            render(&prefs.to_object()),
            "<< /HideToolbar false /Direction /R2L >>"
        );
    }
}
