//! PDF document writer.
//!
//! [`PdfWriter`] owns the whole document: the object store, the page tree,
//! the font and image tables and the drawing cursor. Drawing operators are
//! appended to the current content stream as they are issued; nothing is
//! laid out after the fact. The file itself is assembled by
//! [`PdfWriter::output`](super::output).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};
use indexmap::IndexMap;
use md5::{Digest, Md5};

use super::content_stream::{ContentStreamBuilder, ContentStreamOp};
use super::font_manager::FontEntry;
use super::graphics_state::{Color, ExtGState, FillRule, LineStyle, SavedState};
use super::image_handler::ImageEntry;
use crate::config::{pdf_date, PdfConfig};
use crate::encryption::{Algorithm, EncryptionSettings, EncryptionWriteHandler, SecurityValues};
use crate::error::{Error, Result};
use crate::fonts::metrics::{FileMetricsSource, MetricsSource, StandardMetrics};
use crate::objects::catalog::{Catalog, Info, Outlines, Procset, ViewerPreference, ViewerPreferences};
use crate::objects::contents::Contents;
use crate::objects::javascript::{EmbeddedJs, Javascript};
use crate::objects::navigation::{Action, Annotation, Destination, DestinationFit};
use crate::objects::pages::{Page, Pages, Position};
use crate::objects::security::EncryptionDict;
use crate::store::{ObjectId, ObjectStore, PdfObject};

/// Id of the document catalog.
pub const CATALOG_ID: ObjectId = 1;
/// Id of the outline dictionary.
pub const OUTLINES_ID: ObjectId = 2;
/// Id of the page tree root.
pub const PAGES_ID: ObjectId = 3;
/// Id of the shared procedure set.
pub const PROCSET_ID: ObjectId = 4;
/// Id of the info dictionary.
pub const INFO_ID: ObjectId = 5;

/// How `add_object` places a loose object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectPlacement {
    /// The current page only
    Add,
    /// The current page and every later one
    All,
    /// Odd pages, including the current one if odd
    Odd,
    /// Even pages, including the current one if even
    Even,
    /// Every page after the current one
    Next,
    /// Odd pages after the current one
    NextOdd,
    /// Even pages after the current one
    NextEven,
}

/// Which new pages a loose object is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRule {
    All,
    Odd,
    Even,
}

impl PageRule {
    /// Whether the rule covers the 1-based `page_number`.
    pub fn matches(self, page_number: usize) -> bool {
        match self {
            PageRule::All => true,
            PageRule::Odd => page_number % 2 == 1,
            PageRule::Even => page_number % 2 == 0,
        }
    }
}

/// Active encryption: the write handler and the /Encrypt dictionary.
#[derive(Debug, Clone)]
pub(crate) struct EncryptionState {
    pub handler: EncryptionWriteHandler,
    pub dict_id: ObjectId,
    pub algorithm: Algorithm,
}

/// Everything that ends up in the file.
#[derive(Debug, Clone)]
pub struct DocumentState {
    pub(crate) store: ObjectStore,
    pub(crate) config: PdfConfig,
    pub(crate) creation_date: DateTime<FixedOffset>,
    pub(crate) file_id: [u8; 16],
    /// Fonts by name, in selection order
    pub(crate) fonts: IndexMap<String, FontEntry>,
    /// Code points announced per font name before embedding
    pub(crate) registered_text: BTreeMap<String, BTreeSet<u32>>,
    /// Images by source key
    pub(crate) images: IndexMap<String, ImageEntry>,
    /// Graphics state parameter sets and their resource names
    pub(crate) ext_gstates: Vec<(ExtGState, String)>,
    /// Named destinations
    pub(crate) destinations: IndexMap<String, ObjectId>,
    pub(crate) loose_objects: IndexMap<ObjectId, Option<PageRule>>,
    pub(crate) encryption: Option<EncryptionState>,
    /// The Javascript action behind the EmbeddedJS entry
    pub(crate) javascript: Option<ObjectId>,
    pub(crate) messages: Vec<String>,
}

/// The drawing cursor and the cached graphics state.
#[derive(Debug, Clone, Default)]
pub struct DrawingContext {
    pub(crate) current_page: ObjectId,
    pub(crate) current_contents: ObjectId,
    /// Name of the selected font
    pub(crate) current_font: Option<String>,
    pub(crate) fill_color: Option<Color>,
    pub(crate) stroke_color: Option<Color>,
    pub(crate) line_style: Option<LineStyle>,
    pub(crate) fill_rule: FillRule,
    /// Pushed by `save`, replayed on every new page
    pub(crate) state_stack: Vec<SavedState>,
    /// `(page, contents)` cursors saved by `open_object`/`reopen_object`
    pub(crate) object_stack: Vec<(ObjectId, ObjectId)>,
}

/// A PDF document under construction.
#[derive(Debug)]
pub struct PdfWriter {
    pub(crate) state: DocumentState,
    pub(crate) ctx: DrawingContext,
    checkpoints: Vec<Box<(DocumentState, DrawingContext)>>,
    pub(crate) sources: Vec<Arc<dyn MetricsSource>>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    /// Document with default configuration.
    pub fn new() -> Self {
        Self::with_config(PdfConfig::default())
    }

    /// Document with the given configuration and one empty page.
    pub fn with_config(config: PdfConfig) -> Self {
        let creation_date = config
            .creation_date
            .unwrap_or_else(|| Local::now().into());
        let seed = config
            .document_id
            .clone()
            .unwrap_or_else(|| format!("{}{}", config.producer, creation_date.to_rfc3339()));
        let file_id: [u8; 16] = Md5::digest(seed.as_bytes()).into();

        let mut store = ObjectStore::new();
        let mut catalog = Catalog::new(PAGES_ID);
        catalog.outlines = Some(OUTLINES_ID);
        let mut pages = Pages::new(config.media_box);
        pages.resources.procset = Some(PROCSET_ID);
        let mut info = Info::default();
        info.set("Producer", config.producer.clone());
        for (key, value) in [
            ("Title", &config.title),
            ("Author", &config.author),
            ("Subject", &config.subject),
            ("Creator", &config.creator),
        ] {
            if let Some(value) = value {
                info.set(key, value.clone());
            }
        }
        info.set("CreationDate", pdf_date(&creation_date));

        store.insert(PdfObject::Catalog(catalog));
        store.insert(PdfObject::Outlines(Outlines));
        store.insert(PdfObject::Pages(pages));
        store.insert(PdfObject::Procset(Procset::default()));
        let info_id = store.insert(PdfObject::Info(info));
        debug_assert_eq!(info_id, INFO_ID);

        let sources = Self::default_sources(&config);
        let mut writer = Self {
            state: DocumentState {
                store,
                config,
                creation_date,
                file_id,
                fonts: IndexMap::new(),
                registered_text: BTreeMap::new(),
                images: IndexMap::new(),
                ext_gstates: Vec::new(),
                destinations: IndexMap::new(),
                loose_objects: IndexMap::new(),
                encryption: None,
                javascript: None,
                messages: Vec::new(),
            },
            ctx: DrawingContext::default(),
            checkpoints: Vec::new(),
            sources,
        };
        writer.attach_first_page();
        writer
    }

    fn default_sources(config: &PdfConfig) -> Vec<Arc<dyn MetricsSource>> {
        let files = config
            .font_dirs
            .iter()
            .fold(FileMetricsSource::new(), |source, dir| source.with_dir(dir));
        vec![Arc::new(files), Arc::new(StandardMetrics)]
    }

    // Ids 6 and 7; the page tree is known to be empty here.
    fn attach_first_page(&mut self) {
        let page_id = self.state.store.next_id();
        let contents_id = page_id + 1;
        let mut page = Page::new(PAGES_ID);
        page.add_contents(contents_id);
        self.state.store.insert(PdfObject::Page(page));
        self.state
            .store
            .insert(PdfObject::Contents(Contents::for_page(page_id)));
        if let Ok(pages) = self.state.store.pages_mut(PAGES_ID) {
            pages.add_page(page_id);
        }
        self.ctx.current_page = page_id;
        self.ctx.current_contents = contents_id;
    }

    /// Consult `source` before the built-in font sources.
    pub fn with_metrics_source(mut self, source: impl MetricsSource + 'static) -> Self {
        self.sources.insert(0, Arc::new(source));
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &PdfConfig {
        &self.state.config
    }

    /// Turn stream compression on or off for later outputs.
    pub fn set_compression(&mut self, compress: bool) {
        self.state.config.compress = compress;
    }

    /// The object store, read-only.
    pub fn store(&self) -> &ObjectStore {
        &self.state.store
    }

    /// Diagnostics collected for degraded resources.
    pub fn messages(&self) -> &[String] {
        &self.state.messages
    }

    /// The MD5 file identifier written to the trailer.
    pub fn file_id(&self) -> &[u8; 16] {
        &self.state.file_id
    }

    /// Id of the page being drawn on.
    pub fn current_page(&self) -> ObjectId {
        self.ctx.current_page
    }

    /// Id of the content stream being drawn into.
    pub fn current_contents(&self) -> ObjectId {
        self.ctx.current_contents
    }

    /// Page ids in reading order.
    pub fn page_ids(&self) -> Result<&[ObjectId]> {
        Ok(&self.state.store.pages(PAGES_ID)?.kids)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_ids().map_or(0, <[ObjectId]>::len)
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.state.messages.push(message);
    }

    /// Append operators to the current content stream.
    pub(crate) fn emit<I>(&mut self, ops: I) -> Result<()>
    where
        I: IntoIterator<Item = ContentStreamOp>,
    {
        let ops: Vec<ContentStreamOp> = ops.into_iter().collect();
        if let Some(op) = ops.iter().find(|op| !op.is_finite()) {
            return Err(Error::InvalidArgument(format!("non-finite operand in {:?}", op)));
        }
        let mut builder = ContentStreamBuilder::new();
        builder.ops(ops);
        if builder.is_empty() {
            return Ok(());
        }
        let bytes = builder.build();
        self.state
            .store
            .contents_mut(self.ctx.current_contents)?
            .append(&bytes);
        Ok(())
    }

    pub(crate) fn pages_mut(&mut self) -> Result<&mut Pages> {
        self.state.store.pages_mut(PAGES_ID)
    }

    // ---------------------------------------------------------------
    // Pages
    // ---------------------------------------------------------------

    /// Start a new page at the end of the document.
    ///
    /// Saved graphics states are closed on the old page and re-established
    /// on the new one. Returns the id of the new page's content stream.
    pub fn new_page(&mut self) -> Result<ObjectId> {
        self.start_page(None)
    }

    /// Start a new page before or after the page owning `reference`, a
    /// content stream id as returned by [`new_page`](Self::new_page).
    pub fn insert_page(&mut self, reference: ObjectId, position: Position) -> Result<ObjectId> {
        let reference_page = self
            .state
            .store
            .contents(reference)
            .ok()
            .and_then(|c| c.on_page);
        match reference_page {
            Some(page) => self.start_page(Some((page, position))),
            None => {
                self.warn(format!(
                    "Insert reference {} is not a page content stream; appending",
                    reference
                ));
                self.start_page(None)
            }
        }
    }

    /// Give the current page its own media box, overriding the one the
    /// page tree supplies.
    pub fn set_page_media_box(&mut self, media_box: [f32; 4]) -> Result<()> {
        if media_box.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidArgument(format!("media box {:?}", media_box)));
        }
        self.state.store.page_mut(self.ctx.current_page)?.media_box = Some(media_box);
        Ok(())
    }

    fn start_page(&mut self, placement: Option<(ObjectId, Position)>) -> Result<ObjectId> {
        let depth = self.ctx.state_stack.len();
        self.emit(std::iter::repeat(ContentStreamOp::RestoreState).take(depth))?;

        let page_id = self.state.store.insert(PdfObject::Page(Page::new(PAGES_ID)));
        let pages = self.pages_mut()?;
        let inserted = match placement {
            Some((reference, position)) => pages.insert_page(page_id, reference, position),
            None => {
                pages.add_page(page_id);
                true
            }
        };
        let page_number = pages.page_number(page_id).unwrap_or(pages.kids.len());
        if !inserted {
            self.warn(format!("Unknown reference page; page {} appended", page_id));
        }

        let contents_id = self
            .state
            .store
            .insert(PdfObject::Contents(Contents::for_page(page_id)));
        let loose: Vec<ObjectId> = self
            .state
            .loose_objects
            .iter()
            .filter(|(_, rule)| rule.is_some_and(|r| r.matches(page_number)))
            .map(|(id, _)| *id)
            .collect();
        let page = self.state.store.page_mut(page_id)?;
        for id in loose {
            page.add_contents(id);
        }
        page.add_contents(contents_id);
        log::debug!("Page {} (number {}) with contents {}", page_id, page_number, contents_id);

        self.ctx.current_page = page_id;
        self.ctx.current_contents = contents_id;

        let mut ops = Vec::new();
        for saved in &self.ctx.state_stack {
            ops.extend(saved.ops());
            ops.push(ContentStreamOp::SaveState);
        }
        if let Some(color) = self.ctx.fill_color {
            ops.push(color.fill_op());
        }
        if let Some(color) = self.ctx.stroke_color {
            ops.push(color.stroke_op());
        }
        if let Some(style) = &self.ctx.line_style {
            ops.extend(style.ops());
        }
        self.emit(ops)?;
        Ok(contents_id)
    }

    // ---------------------------------------------------------------
    // Loose objects
    // ---------------------------------------------------------------

    /// Divert drawing into a new loose content stream.
    pub fn open_object(&mut self) -> ObjectId {
        self.ctx
            .object_stack
            .push((self.ctx.current_page, self.ctx.current_contents));
        let id = self
            .state
            .store
            .insert(PdfObject::Contents(Contents::default()));
        self.state.loose_objects.insert(id, None);
        self.ctx.current_contents = id;
        id
    }

    /// Resume drawing into an existing content stream.
    pub fn reopen_object(&mut self, id: ObjectId) -> Result<()> {
        let on_page = self.state.store.contents(id)?.on_page;
        self.ctx
            .object_stack
            .push((self.ctx.current_page, self.ctx.current_contents));
        self.ctx.current_contents = id;
        if let Some(page) = on_page {
            self.ctx.current_page = page;
        }
        Ok(())
    }

    /// Return to the stream that was current before the last open.
    pub fn close_object(&mut self) -> Result<()> {
        let (page, contents) = self.ctx.object_stack.pop().ok_or(Error::NoOpenObject)?;
        self.ctx.current_page = page;
        self.ctx.current_contents = contents;
        Ok(())
    }

    /// Attach a loose object to pages.
    pub fn add_object(&mut self, id: ObjectId, placement: ObjectPlacement) -> Result<()> {
        let rule = *self
            .state
            .loose_objects
            .get(&id)
            .ok_or(Error::NotLooseObject(id))?;
        let current = self
            .state
            .store
            .contents(self.ctx.current_contents)?
            .on_page
            .unwrap_or(self.ctx.current_page);
        let page_number = self.state.store.pages(PAGES_ID)?.page_number(current);

        let (rule, attach_now) = match placement {
            ObjectPlacement::Add => (rule, true),
            ObjectPlacement::All => (Some(PageRule::All), true),
            ObjectPlacement::Odd => (Some(PageRule::Odd), page_number.is_some_and(|n| PageRule::Odd.matches(n))),
            ObjectPlacement::Even => (Some(PageRule::Even), page_number.is_some_and(|n| PageRule::Even.matches(n))),
            ObjectPlacement::Next => (Some(PageRule::All), false),
            ObjectPlacement::NextOdd => (Some(PageRule::Odd), false),
            ObjectPlacement::NextEven => (Some(PageRule::Even), false),
        };
        self.state.loose_objects.insert(id, rule);
        if attach_now {
            self.state.store.page_mut(current)?.add_contents(id);
        }
        Ok(())
    }

    /// Stop attaching a loose object to new pages.
    pub fn stop_object(&mut self, id: ObjectId) -> Result<()> {
        let rule = self
            .state
            .loose_objects
            .get_mut(&id)
            .ok_or(Error::NotLooseObject(id))?;
        *rule = None;
        Ok(())
    }

    /// Whether `id` was created by `open_object`.
    pub fn is_loose_object(&self, id: ObjectId) -> bool {
        self.state.loose_objects.contains_key(&id)
    }

    // ---------------------------------------------------------------
    // Transactions
    // ---------------------------------------------------------------

    /// Snapshot the document; checkpoints nest.
    pub fn start_transaction(&mut self) {
        self.checkpoints
            .push(Box::new((self.state.clone(), self.ctx.clone())));
        log::debug!("Transaction started (depth {})", self.checkpoints.len());
    }

    /// Keep everything since the newest checkpoint and drop it.
    pub fn commit_transaction(&mut self) -> Result<()> {
        self.checkpoints.pop().ok_or(Error::NoTransaction)?;
        Ok(())
    }

    /// Return to the newest checkpoint and keep it open.
    pub fn rewind_transaction(&mut self) -> Result<()> {
        let checkpoint = self.checkpoints.last().ok_or(Error::NoTransaction)?;
        let (state, ctx) = (**checkpoint).clone();
        self.state = state;
        self.ctx = ctx;
        Ok(())
    }

    /// Return to the newest checkpoint and drop it.
    pub fn abort_transaction(&mut self) -> Result<()> {
        let checkpoint = self.checkpoints.pop().ok_or(Error::NoTransaction)?;
        let (state, ctx) = *checkpoint;
        self.state = state;
        self.ctx = ctx;
        Ok(())
    }

    /// Number of open transactions.
    pub fn transaction_depth(&self) -> usize {
        self.checkpoints.len()
    }

    // ---------------------------------------------------------------
    // Document level
    // ---------------------------------------------------------------

    /// Set an info dictionary entry such as `Title` or `Keywords`.
    pub fn add_info(&mut self, key: &str, value: &str) -> Result<()> {
        self.state.store.info_mut(INFO_ID)?.set(key, value);
        Ok(())
    }

    /// Set a viewer preference.
    pub fn set_preference(&mut self, preference: ViewerPreference) -> Result<()> {
        let id = match self.state.store.catalog(CATALOG_ID)?.viewer_preferences {
            Some(id) => id,
            None => {
                let id = self
                    .state
                    .store
                    .insert(PdfObject::ViewerPreferences(ViewerPreferences::default()));
                self.state.store.catalog_mut(CATALOG_ID)?.viewer_preferences = Some(id);
                id
            }
        };
        self.state.store.viewer_preferences_mut(id)?.set(preference);
        Ok(())
    }

    /// Add document-level JavaScript, run when the document opens.
    pub fn add_javascript(&mut self, code: &str) -> Result<()> {
        if let Some(id) = self.state.javascript {
            self.state.store.javascript_mut(id)?.append(code);
            return Ok(());
        }
        let mut script = Javascript::default();
        script.append(code);
        let action = self.state.store.insert(PdfObject::Javascript(script));
        let names = self
            .state
            .store
            .insert(PdfObject::EmbeddedJs(EmbeddedJs { action }));
        self.state.store.catalog_mut(CATALOG_ID)?.javascript = Some(names);
        self.state.javascript = Some(action);
        Ok(())
    }

    /// Clickable area on the current page opening `url`.
    pub fn add_link(&mut self, url: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> Result<ObjectId> {
        self.add_annotation(Action::Uri(url.to_string()), [x0, y0, x1, y1])
    }

    /// Clickable area on the current page jumping to destination `label`.
    ///
    /// The label may be defined later with
    /// [`add_destination`](Self::add_destination).
    pub fn add_internal_link(&mut self, label: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> Result<ObjectId> {
        self.add_annotation(Action::GoTo(label.to_string()), [x0, y0, x1, y1])
    }

    fn add_annotation(&mut self, action: Action, rect: [f32; 4]) -> Result<ObjectId> {
        let action = self.state.store.insert(PdfObject::Action(action));
        let annotation = self
            .state
            .store
            .insert(PdfObject::Annotation(Annotation { action, rect }));
        self.state
            .store
            .page_mut(self.ctx.current_page)?
            .annotations
            .push(annotation);
        Ok(annotation)
    }

    /// Name a view of the current page.
    pub fn add_destination(&mut self, label: &str, fit: DestinationFit) -> Result<ObjectId> {
        let id = self.state.store.insert(PdfObject::Destination(Destination {
            page: self.ctx.current_page,
            fit,
        }));
        self.state.destinations.insert(label.to_string(), id);
        Ok(id)
    }

    /// Open the document on the current page.
    pub fn open_here(&mut self, fit: DestinationFit) -> Result<ObjectId> {
        let id = self.state.store.insert(PdfObject::Destination(Destination {
            page: self.ctx.current_page,
            fit,
        }));
        self.state.store.catalog_mut(CATALOG_ID)?.open_action = Some(id);
        Ok(id)
    }

    /// Encrypt the document with the standard security handler.
    ///
    /// Calling this again replaces the passwords and permissions.
    pub fn set_encryption(&mut self, settings: EncryptionSettings) -> Result<()> {
        let values = SecurityValues::compute(&settings, &self.state.file_id);
        let dict = PdfObject::Encryption(EncryptionDict::new(settings.algorithm, &values));
        let dict_id = match &self.state.encryption {
            Some(existing) => {
                self.state.store.set(existing.dict_id, dict)?;
                existing.dict_id
            }
            None => self.state.store.insert(dict),
        };
        self.state.encryption = Some(EncryptionState {
            handler: EncryptionWriteHandler::from_key(values.key),
            dict_id,
            algorithm: settings.algorithm,
        });
        log::debug!("Encryption {:?} in object {}", settings.algorithm, dict_id);
        Ok(())
    }

    /// Whether `set_encryption` was called.
    pub fn is_encrypted(&self) -> bool {
        self.state.encryption.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ObjectKind;

    fn data(writer: &PdfWriter, id: ObjectId) -> String {
        String::from_utf8(writer.store().contents(id).unwrap().data.clone()).unwrap()
    }

    #[test]
    fn test_singletons_and_first_page() {
        let writer = PdfWriter::new();
        let store = writer.store();
        assert_eq!(store.get(CATALOG_ID).unwrap().kind(), ObjectKind::Catalog);
        assert_eq!(store.get(OUTLINES_ID).unwrap().kind(), ObjectKind::Outlines);
        assert_eq!(store.get(PAGES_ID).unwrap().kind(), ObjectKind::Pages);
        assert_eq!(store.get(PROCSET_ID).unwrap().kind(), ObjectKind::Procset);
        assert_eq!(store.get(INFO_ID).unwrap().kind(), ObjectKind::Info);
        assert_eq!(writer.current_page(), 6);
        assert_eq!(writer.current_contents(), 7);
        assert_eq!(writer.page_ids().unwrap(), &[6]);
        assert_eq!(store.info(INFO_ID).unwrap().get("Producer"), Some("pdf_scribe"));
    }

    #[test]
    fn test_new_page_replays_saved_state() {
        let mut writer = PdfWriter::new();
        writer.set_color(Color::rgb(1.0, 0.0, 0.0)).unwrap();
        writer.save().unwrap();
        writer.set_line_style(LineStyle::new(2.0)).unwrap();
        let contents = writer.new_page().unwrap();

        assert!(data(&writer, 7).ends_with("\nQ"));
        assert_eq!(data(&writer, contents), "\n1 0 0 rg\nq\n2 w");
        assert_eq!(writer.page_count(), 2);
    }

    #[test]
    fn test_insert_page_before_reference() {
        let mut writer = PdfWriter::new();
        let second = writer.new_page().unwrap();
        writer.insert_page(second, Position::Before).unwrap();
        let kids = writer.page_ids().unwrap().to_vec();
        assert_eq!(kids.len(), 3);
        assert_eq!(kids[0], 6);
        assert_eq!(kids[1], writer.current_page());
    }

    #[test]
    fn test_insert_page_unknown_reference_warns() {
        let mut writer = PdfWriter::new();
        writer.insert_page(999, Position::After).unwrap();
        assert_eq!(writer.page_count(), 2);
        assert_eq!(writer.messages().len(), 1);
    }

    #[test]
    fn test_object_diversion() {
        let mut writer = PdfWriter::new();
        let header = writer.open_object();
        assert_eq!(writer.current_contents(), header);
        assert!(writer.is_loose_object(header));
        writer.close_object().unwrap();
        assert_eq!(writer.current_contents(), 7);
        assert!(matches!(writer.close_object(), Err(Error::NoOpenObject)));
        assert!(matches!(
            writer.add_object(7, ObjectPlacement::All),
            Err(Error::NotLooseObject(7))
        ));
    }

    #[test]
    fn test_page_rule_parity() {
        assert!(PageRule::All.matches(4));
        assert!(PageRule::Odd.matches(1));
        assert!(!PageRule::Odd.matches(2));
        assert!(PageRule::Even.matches(2));
    }

    #[test]
    fn test_javascript_appends_to_one_action() {
        let mut writer = PdfWriter::new();
        writer.add_javascript("a();").unwrap();
        writer.add_javascript("b();").unwrap();
        assert_eq!(writer.store().count_kind(ObjectKind::Javascript), 1);
        assert_eq!(writer.store().count_kind(ObjectKind::EmbeddedJs), 1);
        let action = writer.state.javascript.unwrap();
        assert_eq!(writer.store().javascript(action).unwrap().code, "a();\nb();");
    }

    #[test]
    fn test_viewer_preferences_created_once() {
        let mut writer = PdfWriter::new();
        writer.set_preference(ViewerPreference::HideToolbar(true)).unwrap();
        writer.set_preference(ViewerPreference::FitWindow(true)).unwrap();
        assert_eq!(writer.store().count_kind(ObjectKind::ViewerPreferences), 1);
        assert!(writer.store().catalog(CATALOG_ID).unwrap().viewer_preferences.is_some());
    }

    #[test]
    fn test_links_attach_to_current_page() {
        let mut writer = PdfWriter::new();
        let annot = writer.add_link("https://example.com", 0.0, 0.0, 10.0, 10.0).unwrap();
        writer.add_internal_link("end", 0.0, 20.0, 10.0, 30.0).unwrap();
        let page = writer.store().page(6).unwrap();
        assert_eq!(page.annotations.len(), 2);
        assert_eq!(page.annotations[0], annot);
    }

    #[test]
    fn test_set_encryption_twice_reuses_dictionary() {
        let mut writer = PdfWriter::new();
        assert!(!writer.is_encrypted());
        writer.set_encryption(EncryptionSettings::new("a", "b")).unwrap();
        assert!(writer.is_encrypted());
        let first = writer.state.encryption.as_ref().unwrap().dict_id;
        writer.set_encryption(EncryptionSettings::new("c", "d")).unwrap();
        assert_eq!(writer.state.encryption.as_ref().unwrap().dict_id, first);
        assert_eq!(writer.store().count_kind(ObjectKind::Encryption), 1);
    }

    #[test]
    fn test_document_id_seeds_file_id() {
        let a = PdfWriter::with_config(PdfConfig::new().with_document_id("doc"));
        let b = PdfWriter::with_config(PdfConfig::new().with_document_id("doc"));
        assert_eq!(a.file_id(), b.file_id());
    }
}
