//! PASCAL VOC annotation reading.
//!
//! Only the pieces needed to recover labelled boxes are read: the document's
//! `filename` and, for each `object`, its `name` and `bndbox` corners.
//! Objects that cannot be turned into a complete box are dropped and the
//! rest of the document is still returned.

use std::path::Path;

use roxmltree::{Document, Node};

use crate::trace::{trace_debug, trace_warn};
use crate::util::{ObjFindError, ObjFindResult};

/// Axis-aligned box in image pixels, as written in the document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub xmin: f64,
    /// Top edge.
    pub ymin: f64,
    /// Right edge.
    pub xmax: f64,
    /// Bottom edge.
    pub ymax: f64,
}

/// A labelled object.
#[derive(Clone, Debug, PartialEq)]
pub struct VocObject {
    /// Class label, trimmed and never empty.
    pub name: String,
    /// Box corners from `bndbox`.
    pub bbox: BoundingBox,
}

/// Objects extracted from one annotation document, in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VocAnnotation {
    /// Image file the annotation refers to, if the document names one.
    pub filename: Option<String>,
    /// Objects with a name and a complete box.
    pub objects: Vec<VocObject>,
}

/// Parses a VOC annotation from a string.
pub fn extract_objects(xml: &str) -> ObjFindResult<VocAnnotation> {
    let doc = Document::parse(xml).map_err(|err| ObjFindError::Xml {
        reason: err.to_string(),
    })?;
    let root = doc.root_element();

    let filename = child(root, "filename").and_then(text).map(str::to_owned);
    let objects = root
        .children()
        .filter(|node| node.has_tag_name("object"))
        .enumerate()
        .filter_map(|(idx, node)| parse_object(idx, node))
        .collect();

    Ok(VocAnnotation { filename, objects })
}

/// Reads and parses a VOC annotation file.
pub fn extract_objects_from_path(path: impl AsRef<Path>) -> ObjFindResult<VocAnnotation> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path).map_err(|err| ObjFindError::ImageIo {
        reason: format!("{}: {err}", path.display()),
    })?;
    extract_objects(&xml)
}

fn parse_object(idx: usize, node: Node<'_, '_>) -> Option<VocObject> {
    let Some(name) = child(node, "name").and_then(text) else {
        trace_warn!("object without a name skipped", object_idx = idx);
        return None;
    };

    let bbox = child(node, "bndbox").and_then(|bndbox| {
        let coord = |tag: &str| {
            child(bndbox, tag)
                .and_then(text)
                .and_then(|value| value.parse::<f64>().ok())
        };
        Some(BoundingBox {
            xmin: coord("xmin")?,
            ymin: coord("ymin")?,
            xmax: coord("xmax")?,
            ymax: coord("ymax")?,
        })
    });

    match bbox {
        Some(bbox) => Some(VocObject {
            name: name.to_owned(),
            bbox,
        }),
        None => {
            trace_debug!("object without a usable box dropped", object_idx = idx, label = name);
            None
        }
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name(tag))
}

/// Trimmed element text; blank counts as absent.
fn text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|t| !t.is_empty())
}
