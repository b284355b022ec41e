//! XML persistence of the chain set.
//!
//! ```xml
//! <pipelines>
//!   <pipeline blendfactor="0.5">
//!     <operation name="Gaussian blur" enabled="1">
//!       <parameter name="ksize" type="int">3</parameter>
//!     </operation>
//!   </pipeline>
//! </pipelines>
//! ```
//!
//! Reading is lenient: unknown elements are skipped with their whole subtree, unparsable
//! values fall back to `false`/`0`/`0.0`. Only malformed XML and a missing `<pipelines>` root
//! are errors.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::engine::chain::Chain;
use crate::foundation::error::{MorphError, MorphResult};
use crate::params::model::{ParamValue, ParamValues};
use crate::params::options::{Interpolation, MorphShape, MorphType, OptionCode};

const ROOT: &[u8] = b"pipelines";
const PIPELINE: &[u8] = b"pipeline";
const OPERATION: &[u8] = b"operation";
const PARAMETER: &[u8] = b"parameter";
const ELEMENT: &[u8] = b"element";

/// Persisted state of one operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperationConfig {
    pub name: String,
    pub enabled: bool,
    pub values: ParamValues,
}

/// Persisted state of one chain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChainConfig {
    pub weight: f64,
    pub operations: Vec<OperationConfig>,
}

impl ChainConfig {
    /// Snapshot of a live chain's weight and operations.
    pub fn capture(chain: &Chain) -> Self {
        Self {
            weight: chain.weight(),
            operations: chain
                .operations()
                .iter()
                .map(|op| OperationConfig {
                    name: op.name().to_owned(),
                    enabled: op.is_enabled(),
                    values: op
                        .parameters()
                        .iter()
                        .map(|p| (p.name(), p.value()))
                        .collect(),
                })
                .collect(),
        }
    }
}

fn xml_err(context: &str, e: impl std::fmt::Display) -> MorphError {
    MorphError::serde(format!("{context}: {e}"))
}

fn bool_text(v: bool) -> &'static str {
    if v { "1" } else { "0" }
}

fn value_text(value: &ParamValue) -> Option<String> {
    match value {
        ParamValue::Bool(v) => Some(bool_text(*v).to_owned()),
        ParamValue::Int(v)
        | ParamValue::MorphType(v)
        | ParamValue::MorphShape(v)
        | ParamValue::Interpolation(v) => Some(v.to_string()),
        ParamValue::Double(v) => Some(v.to_string()),
        ParamValue::Kernel(_) => None,
    }
}

/// Serialize chains to the XML configuration format.
#[tracing::instrument(skip(chains), fields(chains = chains.len()))]
pub fn write_config(chains: &[ChainConfig]) -> MorphResult<String> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
    let ctx = "write configuration XML";

    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| xml_err(ctx, e))?;
    w.write_event(Event::Start(BytesStart::new("pipelines")))
        .map_err(|e| xml_err(ctx, e))?;

    for chain in chains {
        let weight = chain.weight.to_string();
        let start = BytesStart::new("pipeline").with_attributes([("blendfactor", weight.as_str())]);
        w.write_event(Event::Start(start)).map_err(|e| xml_err(ctx, e))?;

        for op in &chain.operations {
            let start = BytesStart::new("operation").with_attributes([
                ("name", op.name.as_str()),
                ("enabled", bool_text(op.enabled)),
            ]);
            w.write_event(Event::Start(start))
                .map_err(|e| xml_err(ctx, e))?;

            for (name, value) in op.values.iter() {
                let start = BytesStart::new("parameter")
                    .with_attributes([("name", name), ("type", value.type_tag())]);
                w.write_event(Event::Start(start))
                    .map_err(|e| xml_err(ctx, e))?;
                match value {
                    ParamValue::Kernel(elements) => {
                        for v in elements {
                            let text = v.to_string();
                            w.write_event(Event::Start(BytesStart::new("element")))
                                .map_err(|e| xml_err(ctx, e))?;
                            w.write_event(Event::Text(BytesText::new(&text)))
                                .map_err(|e| xml_err(ctx, e))?;
                            w.write_event(Event::End(BytesEnd::new("element")))
                                .map_err(|e| xml_err(ctx, e))?;
                        }
                    }
                    scalar => {
                        if let Some(text) = value_text(scalar) {
                            w.write_event(Event::Text(BytesText::new(&text)))
                                .map_err(|e| xml_err(ctx, e))?;
                        }
                    }
                }
                w.write_event(Event::End(BytesEnd::new("parameter")))
                    .map_err(|e| xml_err(ctx, e))?;
            }

            w.write_event(Event::End(BytesEnd::new("operation")))
                .map_err(|e| xml_err(ctx, e))?;
        }

        w.write_event(Event::End(BytesEnd::new("pipeline")))
            .map_err(|e| xml_err(ctx, e))?;
    }

    w.write_event(Event::End(BytesEnd::new("pipelines")))
        .map_err(|e| xml_err(ctx, e))?;

    let mut out = String::from_utf8(w.into_inner()).map_err(|e| xml_err(ctx, e))?;
    out.push('\n');
    Ok(out)
}

fn parse_bool(text: &str) -> bool {
    let text = text.trim();
    match text {
        "true" => true,
        "false" => false,
        _ => text.parse::<i64>().map(|v| v != 0).unwrap_or_else(|_| {
            tracing::warn!(text, "unparsable boolean; using false");
            false
        }),
    }
}

fn parse_int(text: &str) -> i32 {
    let text = text.trim();
    text.parse().unwrap_or_else(|_| {
        tracing::warn!(text, "unparsable integer; using 0");
        0
    })
}

fn parse_double(text: &str) -> f64 {
    let text = text.trim();
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            tracing::warn!(text, "unparsable number; using 0.0");
            0.0
        }
    }
}

#[derive(Debug)]
struct PendingParameter {
    name: Option<String>,
    type_tag: String,
    text: String,
    elements: Vec<f64>,
}

impl PendingParameter {
    fn finish(self) -> Option<(String, ParamValue)> {
        let Some(name) = self.name else {
            tracing::warn!("parameter without a name skipped");
            return None;
        };
        let text = self.text.as_str();
        let value = match self.type_tag.as_str() {
            "bool" => ParamValue::Bool(parse_bool(text)),
            "int" => ParamValue::Int(parse_int(text)),
            "double" => ParamValue::Double(parse_double(text)),
            "kernel" => ParamValue::Kernel(self.elements),
            t if t == MorphType::TYPE_TAG => ParamValue::MorphType(parse_int(text)),
            t if t == MorphShape::TYPE_TAG => ParamValue::MorphShape(parse_int(text)),
            t if t == Interpolation::TYPE_TAG => ParamValue::Interpolation(parse_int(text)),
            other => {
                tracing::warn!(parameter = %name, type_tag = other, "unknown parameter type skipped");
                return None;
            }
        };
        Some((name, value))
    }
}

#[derive(Debug)]
enum Frame {
    Root,
    Chain(ChainConfig),
    Operation(OperationConfig),
    Parameter(PendingParameter),
    Element(String),
}

fn attributes(e: &BytesStart<'_>) -> MorphResult<Vec<(Vec<u8>, String)>> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| xml_err("read configuration attribute", err))?;
        let value = attr
            .unescape_value()
            .map_err(|err| xml_err("read configuration attribute", err))?;
        out.push((attr.key.as_ref().to_vec(), value.into_owned()));
    }
    Ok(out)
}

fn attr<'a>(attrs: &'a [(Vec<u8>, String)], key: &[u8]) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k.as_slice() == key)
        .map(|(_, v)| v.as_str())
}

/// Open a frame for a start tag, or `None` when the element is unknown in this position.
fn open(parent: Option<&Frame>, e: &BytesStart<'_>) -> MorphResult<Option<Frame>> {
    let name = e.local_name();
    let frame = match (parent, name.as_ref()) {
        (None, ROOT) => Frame::Root,
        (Some(Frame::Root), PIPELINE) => {
            let attrs = attributes(e)?;
            Frame::Chain(ChainConfig {
                weight: attr(&attrs, b"blendfactor").map(parse_double).unwrap_or(0.0),
                operations: Vec::new(),
            })
        }
        (Some(Frame::Chain(_)), OPERATION) => {
            let attrs = attributes(e)?;
            Frame::Operation(OperationConfig {
                name: attr(&attrs, b"name").unwrap_or_default().trim().to_owned(),
                enabled: attr(&attrs, b"enabled").map(parse_bool).unwrap_or(false),
                values: ParamValues::new(),
            })
        }
        (Some(Frame::Operation(_)), PARAMETER) => {
            let attrs = attributes(e)?;
            Frame::Parameter(PendingParameter {
                name: attr(&attrs, b"name").map(str::to_owned),
                type_tag: attr(&attrs, b"type").unwrap_or_default().trim().to_owned(),
                text: String::new(),
                elements: Vec::new(),
            })
        }
        (Some(Frame::Parameter(p)), ELEMENT) if p.type_tag == "kernel" => {
            Frame::Element(String::new())
        }
        (_, other) => {
            tracing::debug!(
                element = %String::from_utf8_lossy(other),
                "skipping unknown configuration element"
            );
            return Ok(None);
        }
    };
    Ok(Some(frame))
}

/// Fold a finished frame into its parent; finished chains go to `chains`.
fn close(stack: &mut Vec<Frame>, frame: Frame, chains: &mut Vec<ChainConfig>) {
    match (frame, stack.last_mut()) {
        (Frame::Chain(c), Some(Frame::Root)) => chains.push(c),
        (Frame::Operation(op), Some(Frame::Chain(c))) => c.operations.push(op),
        (Frame::Parameter(p), Some(Frame::Operation(op))) => {
            if let Some((name, value)) = p.finish() {
                op.values.push(name, value);
            }
        }
        (Frame::Element(text), Some(Frame::Parameter(p))) => p.elements.push(parse_double(&text)),
        _ => {}
    }
}

fn push_text(stack: &mut [Frame], text: &str) {
    match stack.last_mut() {
        Some(Frame::Parameter(p)) => p.text.push_str(text),
        Some(Frame::Element(s)) => s.push_str(text),
        _ => {}
    }
}

/// Parse the XML configuration format into per-chain configs, in document order.
#[tracing::instrument(skip(xml), fields(bytes = xml.len()))]
pub fn read_config(xml: &str) -> MorphResult<Vec<ChainConfig>> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut chains = Vec::new();
    let mut saw_root = false;
    // Depth inside an unknown element whose subtree is being skipped.
    let mut skip = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            xml_err(
                &format!("parse configuration XML at byte {}", reader.buffer_position()),
                e,
            )
        })?;
        match event {
            Event::Start(e) => {
                if skip > 0 {
                    skip += 1;
                    continue;
                }
                match open(stack.last(), &e)? {
                    Some(frame) => {
                        saw_root |= matches!(frame, Frame::Root);
                        stack.push(frame);
                    }
                    None => skip = 1,
                }
            }
            Event::Empty(e) => {
                if skip > 0 {
                    continue;
                }
                if let Some(frame) = open(stack.last(), &e)? {
                    saw_root |= matches!(frame, Frame::Root);
                    if !matches!(frame, Frame::Root) {
                        close(&mut stack, frame, &mut chains);
                    }
                }
            }
            Event::End(_) => {
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                if let Some(frame) = stack.pop() {
                    close(&mut stack, frame, &mut chains);
                }
            }
            Event::Text(t) => {
                if skip == 0 {
                    let text = t
                        .unescape()
                        .map_err(|e| xml_err("read configuration text", e))?;
                    push_text(&mut stack, &text);
                }
            }
            Event::CData(c) => {
                if skip == 0 {
                    let text: Cow<'_, str> = String::from_utf8_lossy(&c);
                    push_text(&mut stack, &text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(MorphError::serde(
            "configuration XML has no <pipelines> root element",
        ));
    }
    Ok(chains)
}

#[cfg(test)]
#[path = "../../tests/unit/config/codec.rs"]
mod tests;
