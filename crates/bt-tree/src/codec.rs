//! Topology ⇄ document conversion and the JSON file helpers.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use bt_core::NodeId;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::builder::TopologyBuilder;
use crate::document::{NodeDocument, TreeDocument};
use crate::node::{Destination, Leaf, NodeClass, NodeSpec};
use crate::topology::Topology;
use crate::{ParseError, TreeResult};

// ── Topology ⇄ document ───────────────────────────────────────────────────────

impl Topology {
    /// Build a topology from the single root entry of `doc`.
    ///
    /// The first malformed node aborts the whole load; the returned
    /// [`ParseError`] carries that node's content.
    pub fn from_document(doc: &TreeDocument) -> TreeResult<Topology> {
        let result = build(doc);
        if let Err(e) = &result {
            error!(error = %e, "failed to build topology from document");
        }
        result
    }

    /// Serialize back into a document.  Children keep their original order;
    /// `limit` is written for every repeater and `destination` for every
    /// `FindPathTo` leaf.
    pub fn to_document(&self) -> TreeDocument {
        TreeDocument::with_root(self.node_document(self.root))
    }

    fn node_document(&self, id: NodeId) -> NodeDocument {
        let Some(node) = self.get(id) else {
            return NodeDocument::default();
        };
        let spec = node.spec();
        NodeDocument {
            class:       Some(spec.class().code().into()),
            name:        Some(spec.name().to_owned()),
            limit:       match spec {
                NodeSpec::Repeater { limit } => Some(limit.into()),
                _ => None,
            },
            destination: match spec {
                NodeSpec::Leaf(Leaf::FindPathTo(d)) => Some(d.code().into()),
                _ => None,
            },
            childs:      node
                .children()
                .iter()
                .map(|&child| self.node_document(child))
                .collect(),
        }
    }
}

// ── JSON helpers ──────────────────────────────────────────────────────────────

/// Parse a topology from a JSON string.
pub fn load_tree_str(json: &str) -> TreeResult<Topology> {
    let doc = read_document(serde_json::Deserializer::from_str(json))?;
    Topology::from_document(&doc)
}

/// Like [`load_tree_str`] but accepts any `Read` source.
pub fn load_tree_reader<R: Read>(reader: R) -> TreeResult<Topology> {
    let doc = read_document(serde_json::Deserializer::from_reader(reader))?;
    Topology::from_document(&doc)
}

/// Each tree level nests an object and a `childs` array; serde_json's default
/// nesting limit of 128 would reject trees deeper than about 63 levels, so it
/// is disabled here.
fn read_document<'de, R>(mut de: serde_json::Deserializer<R>) -> TreeResult<TreeDocument>
where
    R: serde_json::de::Read<'de>,
{
    de.disable_recursion_limit();
    let doc = TreeDocument::deserialize(&mut de)?;
    de.end()?;
    Ok(doc)
}

/// Load a topology from a JSON file.
pub fn load_tree_json(path: &Path) -> TreeResult<Topology> {
    let file = File::open(path)?;
    let topology = load_tree_reader(BufReader::new(file))?;
    info!(
        path  = %path.display(),
        nodes = topology.len(),
        depth = topology.depth(),
        "tree loaded"
    );
    Ok(topology)
}

/// Pretty-printed JSON document for `topology`.
pub fn to_json_string(topology: &Topology) -> TreeResult<String> {
    Ok(serde_json::to_string_pretty(&topology.to_document())?)
}

/// Write `topology` to `path` as pretty-printed JSON, replacing any existing
/// file.
pub fn save_tree_json(topology: &Topology, path: &Path) -> TreeResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &topology.to_document())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %path.display(), nodes = topology.len(), "tree saved");
    Ok(())
}

// ── Parsing ───────────────────────────────────────────────────────────────────

fn build(doc: &TreeDocument) -> TreeResult<Topology> {
    let roots = doc.root_node.as_deref().unwrap_or_default();
    let Some((root, rest)) = roots.split_first() else {
        return Err(ParseError::MissingRoot.into());
    };
    if !rest.is_empty() {
        warn!(ignored = rest.len(), "document has more than one root entry; using the first");
    }

    let mut builder = TopologyBuilder::new();
    parse_node(&mut builder, NodeId::INVALID, root)?;
    builder.build()
}

fn parse_node(builder: &mut TopologyBuilder, parent: NodeId, doc: &NodeDocument) -> TreeResult<NodeId> {
    let spec = parse_spec(doc)?;
    let id = if parent.is_valid() {
        builder.add_child(parent, spec)?
    } else {
        builder.add_root(spec)?
    };
    debug!(%id, %parent, node = %spec, "parsed node");

    match spec.class() {
        NodeClass::Composite => {
            if doc.childs.is_empty() {
                return Err(missing_children(NodeClass::Composite, doc));
            }
            for child in &doc.childs {
                parse_node(builder, id, child)?;
            }
        }
        NodeClass::Decorator => {
            let Some((child, rest)) = doc.childs.split_first() else {
                return Err(missing_children(NodeClass::Decorator, doc));
            };
            if !rest.is_empty() {
                warn!(%id, node = %spec, ignored = rest.len(), "decorator takes one child; extra children ignored");
            }
            parse_node(builder, id, child)?;
        }
        NodeClass::Leaf => {
            if !doc.childs.is_empty() {
                warn!(%id, node = %spec, ignored = doc.childs.len(), "leaf children ignored");
            }
        }
    }
    Ok(id)
}

fn parse_spec(doc: &NodeDocument) -> Result<NodeSpec, ParseError> {
    let code = integer_field(doc, "type", doc.class.as_ref())?
        .ok_or_else(|| ParseError::MissingType { node: doc.raw() })?;
    let class = NodeClass::from_code(code)
        .ok_or_else(|| ParseError::UnknownType { code, node: doc.raw() })?;
    let name = doc.name.as_deref().ok_or_else(|| ParseError::MissingField {
        field: "name",
        node:  doc.raw(),
    })?;

    let spec = match (class, name) {
        (NodeClass::Composite, "SequenceComposite") => NodeSpec::Sequence,
        (NodeClass::Composite, "SelectorComposite") => NodeSpec::Selector,

        (NodeClass::Decorator, "RepeaterDecorator") => NodeSpec::Repeater { limit: parse_limit(doc)? },
        (NodeClass::Decorator, "RepeatUntilFailDecorator") => NodeSpec::RepeatUntilFail,
        (NodeClass::Decorator, "SucceederDecorator") => NodeSpec::Succeeder,
        (NodeClass::Decorator, "InverterDecorator") => NodeSpec::Inverter,

        (NodeClass::Leaf, "WaitForPathLeaf") => NodeSpec::Leaf(Leaf::WaitForPath),
        (NodeClass::Leaf, "MoveToLeaf") => NodeSpec::Leaf(Leaf::MoveTo),
        (NodeClass::Leaf, "HasDwellingLeaf") => NodeSpec::Leaf(Leaf::HasDwelling),
        (NodeClass::Leaf, "SetDwellingLeaf") => NodeSpec::Leaf(Leaf::SetDwelling),
        (NodeClass::Leaf, "EnterDwellingLeaf") => NodeSpec::Leaf(Leaf::EnterDwelling),
        (NodeClass::Leaf, "ExitDwellingLeaf") => NodeSpec::Leaf(Leaf::ExitDwelling),
        (NodeClass::Leaf, "EnterWorkingPlaceLeaf") => NodeSpec::Leaf(Leaf::EnterWorkingPlace),
        (NodeClass::Leaf, "ExitWorkingPlaceLeaf") => NodeSpec::Leaf(Leaf::ExitWorkingPlace),
        (NodeClass::Leaf, "HasJobLeaf") => NodeSpec::Leaf(Leaf::HasJob),
        (NodeClass::Leaf, "HasStaticJobLeaf") => NodeSpec::Leaf(Leaf::HasStaticJob),
        (NodeClass::Leaf, "AssignJobLeaf") => NodeSpec::Leaf(Leaf::AssignJob),
        (NodeClass::Leaf, "IsDayTimeLeaf") => NodeSpec::Leaf(Leaf::IsDayTime),
        (NodeClass::Leaf, "IsNightTimeLeaf") => NodeSpec::Leaf(Leaf::IsNightTime),
        (NodeClass::Leaf, "WaitDayTimeLeaf") => NodeSpec::Leaf(Leaf::WaitDayTime),
        (NodeClass::Leaf, "WaitNightTimeLeaf") => NodeSpec::Leaf(Leaf::WaitNightTime),
        (NodeClass::Leaf, "AskInventoryTaskLeaf") => NodeSpec::Leaf(Leaf::AskInventoryTask),
        (NodeClass::Leaf, "TakeResourceLeaf") => NodeSpec::Leaf(Leaf::TakeResource),
        (NodeClass::Leaf, "PutResourceLeaf") => NodeSpec::Leaf(Leaf::PutResource),
        (NodeClass::Leaf, "FindPathToLeaf") => NodeSpec::Leaf(Leaf::FindPathTo(parse_destination(doc)?)),

        (class, name) => {
            return Err(ParseError::UnknownName {
                class,
                name: name.to_owned(),
                node: doc.raw(),
            });
        }
    };
    Ok(spec)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `None` when the field is absent or null; an error unless it is an integer.
fn integer_field(doc: &NodeDocument, field: &'static str, value: Option<&Value>) -> Result<Option<i64>, ParseError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v.as_i64().map(Some).ok_or_else(|| ParseError::NotAnInteger {
            field,
            node: doc.raw(),
        }),
    }
}

fn parse_limit(doc: &NodeDocument) -> Result<u32, ParseError> {
    match integer_field(doc, "limit", doc.limit.as_ref())? {
        None => Ok(0),
        Some(value) => u32::try_from(value).map_err(|_| ParseError::InvalidField {
            field: "limit",
            value,
            node:  doc.raw(),
        }),
    }
}

fn parse_destination(doc: &NodeDocument) -> Result<Destination, ParseError> {
    let value = integer_field(doc, "destination", doc.destination.as_ref())?.ok_or_else(|| ParseError::MissingField {
        field: "destination",
        node:  doc.raw(),
    })?;
    Destination::from_code(value).ok_or_else(|| ParseError::InvalidField {
        field: "destination",
        value,
        node:  doc.raw(),
    })
}

fn missing_children(class: NodeClass, doc: &NodeDocument) -> crate::TreeError {
    ParseError::MissingChildren { class, node: doc.raw() }.into()
}
