//! DGML reader on top of the quick-xml event stream.

use super::{Document, DocumentBuilder, ParseError, well_known_namespace};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

/// Read an XML string into a document
///
/// Element namespaces come from in-scope `xmlns` declarations; prefixes that
/// are never declared fall back to the well-known DGML table. Comments,
/// processing instructions, declarations and doctypes are skipped. Input
/// without any element yields an empty document.
pub(super) fn read_document(xml: &str) -> Result<Document, ParseError> {
    let mut reader = NsReader::from_str(xml);
    let mut builder = DocumentBuilder::new();

    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(ref e) => {
                let namespace = namespace_uri(resolved);
                let (name, attributes) = read_start(e)?;
                builder.open_element_in(&name, namespace, attributes)?;
            }
            Event::Empty(ref e) => {
                let namespace = namespace_uri(resolved);
                let (name, attributes) = read_start(e)?;
                builder.open_element_in(&name, namespace, attributes)?;
                builder.close_element(Some(&name))?;
            }
            Event::End(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                builder.close_element(Some(&name))?;
            }
            Event::Text(ref e) => {
                let text = e.unescape()?;
                builder.push_text(&text);
            }
            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e.as_ref());
                builder.push_text(&text);
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    builder.build()
}

fn namespace_uri(resolved: ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(ns) => {
            let uri = String::from_utf8_lossy(ns.as_ref()).to_string();
            (!uri.is_empty()).then_some(uri)
        }
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            well_known_namespace(&String::from_utf8_lossy(&prefix)).map(str::to_string)
        }
    }
}

fn read_start(e: &BytesStart<'_>) -> Result<(String, Vec<(String, String)>), ParseError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok((name, attributes))
}
