//! Link annotations, actions and destinations.

use super::OutContext;
use crate::fonts::encoding::encode_text_string;
use crate::object::{Dict, Object};
use crate::store::ObjectId;

/// A link annotation.
#[derive(Debug, Clone)]
pub struct Annotation {
    /// Action run on click
    pub action: ObjectId,
    /// `[x0 y0 x1 y1]`
    pub rect: [f32; 4],
}

impl Annotation {
    /// Build the annotation dictionary.
    pub fn to_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert("Type".into(), Object::name("Annot"));
        dict.insert("Subtype".into(), Object::name("Link"));
        dict.insert("A".into(), Object::reference(self.action));
        dict.insert("Border".into(), Object::integers([0, 0, 0]));
        dict.insert("H".into(), Object::name("I"));
        dict.insert("Rect".into(), Object::reals(&self.rect));
        Object::Dictionary(dict)
    }
}

/// A link action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a URI
    Uri(String),
    /// Jump to a named destination
    GoTo(String),
}

impl Action {
    /// Build the action dictionary.
    ///
    /// A GoTo whose label has no destination is written without /S.
    pub fn to_object(&self, ctx: &OutContext<'_>) -> Object {
        let mut dict = Dict::new();
        dict.insert("Type".into(), Object::name("Action"));
        match self {
            Action::Uri(uri) => {
                dict.insert("S".into(), Object::name("URI"));
                dict.insert("URI".into(), Object::String(encode_text_string(uri)));
            }
            Action::GoTo(label) => match ctx.destinations.get(label) {
                Some(id) => {
                    dict.insert("S".into(), Object::name("GoTo"));
                    dict.insert("D".into(), Object::reference(*id));
                }
                None => log::warn!("Internal link to unknown destination {:?}", label),
            },
        }
        Object::Dictionary(dict)
    }
}

/// How a destination positions the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DestinationFit {
    /// Left, top and zoom; `None` keeps the current value
    Xyz {
        left: Option<f32>,
        top: Option<f32>,
        zoom: Option<f32>,
    },
    /// Whole page
    Fit,
    /// Page width at a top coordinate
    FitH(f32),
    /// Page height at a left coordinate
    FitV(f32),
    /// A rectangle: left, bottom, right, top
    FitR(f32, f32, f32, f32),
    /// Bounding box
    FitB,
    /// Bounding box width at a top coordinate
    FitBH(f32),
    /// Bounding box height at a left coordinate
    FitBV(f32),
}

impl DestinationFit {
    fn params(&self) -> (&'static str, Vec<Object>) {
        fn opt(v: Option<f32>) -> Object {
            v.map_or(Object::Null, Object::from)
        }
        match *self {
            DestinationFit::Xyz { left, top, zoom } => ("XYZ", vec![opt(left), opt(top), opt(zoom)]),
            DestinationFit::Fit => ("Fit", vec![]),
            DestinationFit::FitH(top) => ("FitH", vec![top.into()]),
            DestinationFit::FitV(left) => ("FitV", vec![left.into()]),
            DestinationFit::FitR(l, b, r, t) => ("FitR", vec![l.into(), b.into(), r.into(), t.into()]),
            DestinationFit::FitB => ("FitB", vec![]),
            DestinationFit::FitBH(top) => ("FitBH", vec![top.into()]),
            DestinationFit::FitBV(left) => ("FitBV", vec![left.into()]),
        }
    }
}

/// An explicit destination.
#[derive(Debug, Clone)]
pub struct Destination {
    /// Target page
    pub page: ObjectId,
    /// View
    pub fit: DestinationFit,
}

impl Destination {
    /// `[page 0 R /Fit params...]`
    pub fn to_object(&self) -> Object {
        let (name, params) = self.fit.params();
        let mut array = vec![Object::reference(self.page), Object::name(name)];
        array.extend(params);
        Object::Array(array)
    }
}
