//! The page tree and its pages.
//!
//! Resources are pooled on the single Pages node rather than repeated per
//! page, so a font or image is listed once however many pages use it.

use indexmap::IndexMap;

use crate::object::{Dict, Object};
use crate::store::ObjectId;

/// Where to insert a page relative to a reference page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Before,
    After,
}

/// Resources shared by every page of the tree.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    /// Procedure set array object
    pub procset: Option<ObjectId>,
    /// `/F<n>` fonts
    pub fonts: IndexMap<String, ObjectId>,
    /// `/I<n>` images
    pub xobjects: IndexMap<String, ObjectId>,
    /// `/GS<n>` graphics states
    pub ext_gstates: IndexMap<String, ObjectId>,
}

impl Resources {
    fn to_object(&self) -> Object {
        fn refs(map: &IndexMap<String, ObjectId>) -> Object {
            Object::Dictionary(
                map.iter()
                    .map(|(name, id)| (name.clone(), Object::reference(*id)))
                    .collect(),
            )
        }

        let mut dict = Dict::new();
        if let Some(id) = self.procset {
            dict.insert("ProcSet".into(), Object::reference(id));
        }
        if !self.fonts.is_empty() {
            dict.insert("Font".into(), refs(&self.fonts));
        }
        if !self.xobjects.is_empty() {
            dict.insert("XObject".into(), refs(&self.xobjects));
        }
        if !self.ext_gstates.is_empty() {
            dict.insert("ExtGState".into(), refs(&self.ext_gstates));
        }
        Object::Dictionary(dict)
    }
}

/// Root of the page tree.
#[derive(Debug, Clone)]
pub struct Pages {
    /// Page ids in reading order
    pub kids: Vec<ObjectId>,
    /// Pooled resources
    pub resources: Resources,
    /// Media box inherited by the pages
    pub media_box: [f32; 4],
}

impl Pages {
    /// Empty tree with the given media box.
    pub fn new(media_box: [f32; 4]) -> Self {
        Self {
            kids: Vec::new(),
            resources: Resources::default(),
            media_box,
        }
    }

    /// Append a page.
    pub fn add_page(&mut self, page: ObjectId) {
        self.kids.push(page);
    }

    /// Insert a page before or after `reference`.
    ///
    /// Returns `false` when `reference` is not in the tree; the page is
    /// appended in that case.
    pub fn insert_page(&mut self, page: ObjectId, reference: ObjectId, position: Position) -> bool {
        match self.kids.iter().position(|&id| id == reference) {
            Some(index) => {
                let at = match position {
                    Position::Before => index,
                    Position::After => index + 1,
                };
                self.kids.insert(at, page);
                true
            }
            None => {
                self.kids.push(page);
                false
            }
        }
    }

    /// 1-based page number of `page`.
    pub fn page_number(&self, page: ObjectId) -> Option<usize> {
        self.kids.iter().position(|&id| id == page).map(|i| i + 1)
    }

    /// Build the Pages dictionary.
    pub fn to_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert("Type".into(), Object::name("Pages"));
        if self.kids.is_empty() {
            dict.insert("Count".into(), Object::Integer(0));
            return Object::Dictionary(dict);
        }
        dict.insert(
            "Kids".into(),
            Object::Array(self.kids.iter().map(|id| Object::reference(*id)).collect()),
        );
        dict.insert("Count".into(), Object::Integer(self.kids.len() as i64));
        dict.insert("Resources".into(), self.resources.to_object());
        dict.insert("MediaBox".into(), Object::reals(&self.media_box));
        Object::Dictionary(dict)
    }
}

/// One page.
#[derive(Debug, Clone)]
pub struct Page {
    /// The Pages node
    pub parent: ObjectId,
    /// Content streams, loose objects first
    pub contents: Vec<ObjectId>,
    /// Link annotations
    pub annotations: Vec<ObjectId>,
    /// Own media box; inherited from the tree when `None`
    pub media_box: Option<[f32; 4]>,
}

impl Page {
    /// Empty page under `parent`.
    pub fn new(parent: ObjectId) -> Self {
        Self {
            parent,
            contents: Vec::new(),
            annotations: Vec::new(),
            media_box: None,
        }
    }

    /// Attach a content stream once.
    pub fn add_contents(&mut self, id: ObjectId) {
        if !self.contents.contains(&id) {
            self.contents.push(id);
        }
    }

    /// Build the Page dictionary.
    pub fn to_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert("Type".into(), Object::name("Page"));
        dict.insert("Parent".into(), Object::reference(self.parent));
        if let Some(media_box) = &self.media_box {
            dict.insert("MediaBox".into(), Object::reals(media_box));
        }
        if !self.annotations.is_empty() {
            dict.insert(
                "Annots".into(),
                Object::Array(self.annotations.iter().map(|id| Object::reference(*id)).collect()),
            );
        }
        match self.contents.as_slice() {
            [] => {}
            [single] => {
                dict.insert("Contents".into(), Object::reference(*single));
            }
            many => {
                dict.insert(
                    "Contents".into(),
                    Object::Array(many.iter().map(|id| Object::reference(*id)).collect()),
                );
            }
        }
        Object::Dictionary(dict)
    }
}
