//! The object store: an arena of typed PDF objects keyed by id.
//!
//! Ids are 1-based and handed out in call order; id 0 is the head of the
//! xref free list. An id is never reused. An allocated slot stays empty
//! until an object is set there, and output fails on empty slots.

use crate::error::{Error, Result};
use crate::object::Object;
use crate::objects::catalog::{Catalog, Info, Outlines, Procset, ViewerPreferences};
use crate::objects::contents::Contents;
use crate::objects::font::{CidFont, CidToGidMap, Font, FontDescriptor, FontEncoding, FontFile, ToUnicode};
use crate::objects::image::Image;
use crate::objects::javascript::{EmbeddedJs, Javascript};
use crate::objects::navigation::{Action, Annotation, Destination};
use crate::objects::pages::{Page, Pages};
use crate::objects::security::EncryptionDict;
use crate::objects::OutContext;
use crate::writer::ExtGState;

/// Object number.
pub type ObjectId = u32;

/// The kind of a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Catalog,
    Pages,
    Page,
    Outlines,
    Font,
    FontDescriptor,
    FontEncoding,
    FontDescendantCid,
    FontGidToCidMap,
    FontToUnicode,
    FontFile,
    Procset,
    Info,
    Action,
    Annotation,
    Contents,
    Image,
    ExtGState,
    Encryption,
    Destination,
    ViewerPreferences,
    EmbeddedJs,
    Javascript,
}

/// A typed document object.
#[derive(Debug, Clone)]
pub enum PdfObject {
    Catalog(Catalog),
    Pages(Pages),
    Page(Page),
    Outlines(Outlines),
    Font(Font),
    FontDescriptor(FontDescriptor),
    FontEncoding(FontEncoding),
    FontDescendantCid(CidFont),
    FontGidToCidMap(CidToGidMap),
    FontToUnicode(ToUnicode),
    FontFile(FontFile),
    Procset(Procset),
    Info(Info),
    Action(Action),
    Annotation(Annotation),
    Contents(Contents),
    Image(Image),
    ExtGState(ExtGState),
    Encryption(EncryptionDict),
    Destination(Destination),
    ViewerPreferences(ViewerPreferences),
    EmbeddedJs(EmbeddedJs),
    Javascript(Javascript),
}

impl PdfObject {
    /// Kind tag of this object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            PdfObject::Catalog(_) => ObjectKind::Catalog,
            PdfObject::Pages(_) => ObjectKind::Pages,
            PdfObject::Page(_) => ObjectKind::Page,
            PdfObject::Outlines(_) => ObjectKind::Outlines,
            PdfObject::Font(_) => ObjectKind::Font,
            PdfObject::FontDescriptor(_) => ObjectKind::FontDescriptor,
            PdfObject::FontEncoding(_) => ObjectKind::FontEncoding,
            PdfObject::FontDescendantCid(_) => ObjectKind::FontDescendantCid,
            PdfObject::FontGidToCidMap(_) => ObjectKind::FontGidToCidMap,
            PdfObject::FontToUnicode(_) => ObjectKind::FontToUnicode,
            PdfObject::FontFile(_) => ObjectKind::FontFile,
            PdfObject::Procset(_) => ObjectKind::Procset,
            PdfObject::Info(_) => ObjectKind::Info,
            PdfObject::Action(_) => ObjectKind::Action,
            PdfObject::Annotation(_) => ObjectKind::Annotation,
            PdfObject::Contents(_) => ObjectKind::Contents,
            PdfObject::Image(_) => ObjectKind::Image,
            PdfObject::ExtGState(_) => ObjectKind::ExtGState,
            PdfObject::Encryption(_) => ObjectKind::Encryption,
            PdfObject::Destination(_) => ObjectKind::Destination,
            PdfObject::ViewerPreferences(_) => ObjectKind::ViewerPreferences,
            PdfObject::EmbeddedJs(_) => ObjectKind::EmbeddedJs,
            PdfObject::Javascript(_) => ObjectKind::Javascript,
        }
    }

    /// Lower to a generic PDF value.
    pub fn to_object(&self, ctx: &OutContext<'_>) -> Result<Object> {
        Ok(match self {
            PdfObject::Catalog(o) => o.to_object(),
            PdfObject::Pages(o) => o.to_object(),
            PdfObject::Page(o) => o.to_object(),
            PdfObject::Outlines(o) => o.to_object(),
            PdfObject::Font(o) => o.to_object(),
            PdfObject::FontDescriptor(o) => o.to_object(),
            PdfObject::FontEncoding(o) => o.to_object(),
            PdfObject::FontDescendantCid(o) => o.to_object(),
            PdfObject::FontGidToCidMap(o) => o.to_object(ctx)?,
            PdfObject::FontToUnicode(o) => o.to_object(ctx)?,
            PdfObject::FontFile(o) => o.to_object(ctx)?,
            PdfObject::Procset(o) => o.to_object(),
            PdfObject::Info(o) => o.to_object(),
            PdfObject::Action(o) => o.to_object(ctx),
            PdfObject::Annotation(o) => o.to_object(),
            PdfObject::Contents(o) => o.to_object(ctx)?,
            PdfObject::Image(o) => o.to_object(ctx)?,
            PdfObject::ExtGState(o) => o.to_object(),
            PdfObject::Encryption(o) => o.to_object(),
            PdfObject::Destination(o) => o.to_object(),
            PdfObject::ViewerPreferences(o) => o.to_object(),
            PdfObject::EmbeddedJs(o) => o.to_object(),
            PdfObject::Javascript(o) => o.to_object(),
        })
    }
}

/// Arena of objects; slot `i` holds object `i + 1`.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    slots: Vec<Option<PdfObject>>,
}

macro_rules! typed_access {
    ($($variant:ident => $ty:ty, $get:ident, $get_mut:ident;)*) => {
        $(
            #[doc = concat!("The ", stringify!($variant), " object at `id`.")]
            pub fn $get(&self, id: ObjectId) -> Result<&$ty> {
                match self.get(id)? {
                    PdfObject::$variant(o) => Ok(o),
                    other => Err(Error::UnexpectedObject {
                        id,
                        expected: ObjectKind::$variant,
                        found: other.kind(),
                    }),
                }
            }

            #[doc = concat!("Mutable access to the ", stringify!($variant), " object at `id`.")]
            pub fn $get_mut(&mut self, id: ObjectId) -> Result<&mut $ty> {
                match self.get_mut(id)? {
                    PdfObject::$variant(o) => Ok(o),
                    other => Err(Error::UnexpectedObject {
                        id,
                        expected: ObjectKind::$variant,
                        found: other.kind(),
                    }),
                }
            }
        )*
    };
}

impl ObjectStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next id without an object.
    pub fn allocate(&mut self) -> ObjectId {
        self.slots.push(None);
        let id = self.slots.len() as ObjectId;
        log::trace!("Allocated object {}", id);
        id
    }

    /// Allocate an id and store `object` there.
    pub fn insert(&mut self, object: PdfObject) -> ObjectId {
        let kind = object.kind();
        self.slots.push(Some(object));
        let id = self.slots.len() as ObjectId;
        log::debug!("New {:?} object {}", kind, id);
        id
    }

    /// Store `object` at an allocated id, replacing what was there.
    pub fn set(&mut self, id: ObjectId, object: PdfObject) -> Result<()> {
        let slot = self.slot_mut(id)?;
        *slot = Some(object);
        Ok(())
    }

    /// The object at `id`.
    pub fn get(&self, id: ObjectId) -> Result<&PdfObject> {
        let index = Self::index(id)?;
        match self.slots.get(index) {
            Some(Some(object)) => Ok(object),
            Some(None) => Err(Error::DanglingReference(id)),
            None => Err(Error::UnknownObject(id)),
        }
    }

    /// Mutable access to the object at `id`.
    pub fn get_mut(&mut self, id: ObjectId) -> Result<&mut PdfObject> {
        self.slot_mut(id)?
            .as_mut()
            .ok_or(Error::DanglingReference(id))
    }

    /// Mutate the object at `id` in place.
    pub fn update<F>(&mut self, id: ObjectId, f: F) -> Result<()>
    where
        F: FnOnce(&mut PdfObject),
    {
        f(self.get_mut(id)?);
        Ok(())
    }

    /// The id the next allocation will return.
    pub fn next_id(&self) -> ObjectId {
        self.slots.len() as ObjectId + 1
    }

    /// Number of allocated ids.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing was allocated yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Populated objects in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &PdfObject)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|o| (i as ObjectId + 1, o)))
    }

    /// Number of stored objects of `kind`.
    pub fn count_kind(&self, kind: ObjectKind) -> usize {
        self.iter().filter(|(_, o)| o.kind() == kind).count()
    }

    typed_access! {
        Catalog => Catalog, catalog, catalog_mut;
        Pages => Pages, pages, pages_mut;
        Page => Page, page, page_mut;
        Info => Info, info, info_mut;
        Procset => Procset, procset, procset_mut;
        Contents => Contents, contents, contents_mut;
        Font => Font, font, font_mut;
        Image => Image, image, image_mut;
        ViewerPreferences => ViewerPreferences, viewer_preferences, viewer_preferences_mut;
        Javascript => Javascript, javascript, javascript_mut;
    }

    fn index(id: ObjectId) -> Result<usize> {
        if id == 0 {
            return Err(Error::UnknownObject(id));
        }
        Ok(id as usize - 1)
    }

    fn slot_mut(&mut self, id: ObjectId) -> Result<&mut Option<PdfObject>> {
        let index = Self::index(id)?;
        self.slots.get_mut(index).ok_or(Error::UnknownObject(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::catalog::Outlines;

    #[test]
    fn test_ids_are_monotonic() {
        let mut store = ObjectStore::new();
        assert_eq!(store.next_id(), 1);
        assert_eq!(store.insert(PdfObject::Outlines(Outlines)), 1);
        assert_eq!(store.allocate(), 2);
        assert_eq!(store.insert(PdfObject::Outlines(Outlines)), 3);
        assert_eq!(store.next_id(), 4);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_dangling_and_unknown() {
        let mut store = ObjectStore::new();
        let id = store.allocate();
        assert!(matches!(store.get(id), Err(Error::DanglingReference(1))));
        assert!(matches!(store.get(9), Err(Error::UnknownObject(9))));
        assert!(matches!(store.get(0), Err(Error::UnknownObject(0))));
        assert!(matches!(
            store.set(5, PdfObject::Outlines(Outlines)),
            Err(Error::UnknownObject(5))
        ));

        store.set(id, PdfObject::Outlines(Outlines)).unwrap();
        assert_eq!(store.get(id).unwrap().kind(), ObjectKind::Outlines);
    }

    #[test]
    fn test_typed_access_kind_mismatch() {
        let mut store = ObjectStore::new();
        let id = store.insert(PdfObject::Outlines(Outlines));
        match store.page_mut(id) {
            Err(Error::UnexpectedObject {
                expected, found, ..
            }) => {
                assert_eq!(expected, ObjectKind::Page);
                assert_eq!(found, ObjectKind::Outlines);
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_update_in_place() {
        let mut store = ObjectStore::new();
        let id = store.insert(PdfObject::Contents(Contents::default()));
        store
            .update(id, |o| {
                if let PdfObject::Contents(c) = o {
                    c.append(b"\nq");
                }
            })
            .unwrap();
        assert_eq!(store.contents(id).unwrap().data, b"\nq");
    }

    #[test]
    fn test_iter_skips_empty_slots() {
        let mut store = ObjectStore::new();
        store.insert(PdfObject::Outlines(Outlines));
        store.allocate();
        let ids: Vec<_> = store.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(store.count_kind(ObjectKind::Outlines), 1);
    }
}
