use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Invalid attribute: {0}")]
    Attribute(String),

    #[error("Closing tag </{0}> without a matching open element")]
    UnexpectedClose(String),

    #[error("Mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClose { expected: String, found: String },

    #[error("Element <{0}> is never closed")]
    Unclosed(String),

    #[error("Second root element <{0}> after the document element")]
    MultipleRoots(String),
}

impl From<quick_xml::Error> for ParseError {
    fn from(e: quick_xml::Error) -> Self {
        ParseError::Xml(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        ParseError::Attribute(e.to_string())
    }
}
