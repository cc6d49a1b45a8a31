//! Page geometry of a loaded PDF

use crate::error::EditorError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;

/// US Letter, used when a page has no usable MediaBox.
pub const DEFAULT_PAGE_SIZE: (f64, f64) = (612.0, 792.0);

/// Parent chains deeper than this are treated as broken.
const MAX_INHERITANCE_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageInfo {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub pages: Vec<PageInfo>,
}

impl DocumentInfo {
    /// Parse `bytes` and read every page's size.
    pub fn inspect(bytes: &[u8]) -> Result<Self, EditorError> {
        let doc = Document::load_mem(bytes).map_err(|e| EditorError::ParseError(e.to_string()))?;
        Ok(Self::from_document(&doc))
    }

    pub fn from_document(doc: &Document) -> Self {
        let pages = doc
            .get_pages()
            .values()
            .map(|&page_id| page_size(doc, page_id))
            .collect();
        Self { pages }
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    pub fn page_heights(&self) -> Vec<f64> {
        self.pages.iter().map(|p| p.height).collect()
    }
}

fn page_size(doc: &Document, page_id: ObjectId) -> PageInfo {
    let (width, height) = inherited(doc, page_id, b"MediaBox")
        .and_then(|obj| media_box_size(doc, obj))
        .unwrap_or(DEFAULT_PAGE_SIZE);
    PageInfo { width, height }
}

fn media_box_size(doc: &Document, obj: &Object) -> Option<(f64, f64)> {
    let arr = resolve(doc, obj).as_array().ok()?;
    if arr.len() != 4 {
        return None;
    }
    let nums: Vec<f64> = arr
        .iter()
        .map(|o| number(resolve(doc, o)))
        .collect::<Option<_>>()?;
    let width = (nums[2] - nums[0]).abs();
    let height = (nums[3] - nums[1]).abs();
    (width > 0.0 && height > 0.0).then_some((width, height))
}

/// Look `key` up on the page, then up its Parent chain.
pub(crate) fn inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut dict: &Dictionary = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Follow a single indirect reference, if any.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}
