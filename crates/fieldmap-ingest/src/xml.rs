//! XML field inference.
//!
//! The document is read with a pull parser. Every element becomes a
//! [`Field`] whose children are its attributes (as `@name`, addressed as
//! `element[@name]`) followed by its child elements.

use fieldmap_model::{Field, FieldType, SourceFormat};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::error::{IngestError, Result};
use crate::options::InferOptions;

/// Element still waiting for its end tag.
struct OpenElement {
    field: Field,
    has_elements: bool,
    /// False once the element lies below the depth cap; it is parsed but not kept.
    kept: bool,
}

pub(crate) fn infer(content: &str, options: &InferOptions) -> Result<Vec<Field>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<Field> = None;

    loop {
        let event = reader.read_event().map_err(|err| {
            malformed(format!(
                "{err} at position {}",
                reader.error_position()
            ))
        })?;
        match event {
            Event::Start(start) => {
                let element = open(&start, &stack, root.is_some(), options)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = open(&start, &stack, root.is_some(), options)?;
                close(element, &mut stack, &mut root);
            }
            Event::End(end) => {
                let Some(element) = stack.pop() else {
                    return Err(malformed(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(end.name().as_ref())
                    )));
                };
                close(element, &mut stack, &mut root);
            }
            Event::Text(text) => {
                if stack.is_empty() && !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(malformed("text outside the root element"));
                }
            }
            Event::CData(_) => {
                if stack.is_empty() {
                    return Err(malformed("character data outside the root element"));
                }
            }
            Event::GeneralRef(reference) => {
                if stack.is_empty() {
                    return Err(malformed("entity reference outside the root element"));
                }
                check_reference(&reference)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!("unclosed element <{}>", open.field.name)));
    }
    root.map(|field| vec![field])
        .ok_or_else(|| malformed("no root element"))
}

fn open(
    start: &BytesStart<'_>,
    stack: &[OpenElement],
    has_root: bool,
    options: &InferOptions,
) -> Result<OpenElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let parent = stack.last();
    if parent.is_none() && has_root {
        return Err(malformed(format!("second root element <{name}>")));
    }

    let path = match parent {
        Some(parent) => format!("{}.{name}", parent.field.path),
        None => name.clone(),
    };
    let kept = stack.len() <= options.max_depth && parent.is_none_or(|parent| parent.kept);

    let mut children = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| malformed(err.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref());
        children.push(Field::leaf(
            format!("@{key}"),
            format!("{path}[@{key}]"),
            FieldType::String,
        ));
    }

    Ok(OpenElement {
        field: Field::branch(name, path, FieldType::String, children),
        has_elements: false,
        kept,
    })
}

fn close(mut element: OpenElement, stack: &mut [OpenElement], root: &mut Option<Field>) {
    if element.has_elements {
        element.field.field_type = Some(FieldType::Object);
    }
    match stack.last_mut() {
        Some(parent) => {
            parent.has_elements = true;
            if element.kept {
                parent.field.push_child(element.field);
            }
        }
        None => *root = Some(element.field),
    }
}

/// Accept character references and the five predefined entities; the
/// document cannot declare any others.
fn check_reference(reference: &BytesRef<'_>) -> Result<()> {
    if reference.is_char_ref() {
        return match reference.resolve_char_ref() {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(malformed("character reference without a value")),
            Err(err) => Err(malformed(err.to_string())),
        };
    }
    let name = reference
        .decode()
        .map_err(|err| malformed(err.to_string()))?;
    match resolve_predefined_entity(&name) {
        Some(_) => Ok(()),
        None => Err(malformed(format!("undefined entity &{name};"))),
    }
}

fn malformed(message: impl Into<String>) -> IngestError {
    IngestError::parse(SourceFormat::Xml, message)
}
