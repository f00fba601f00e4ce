//! Minimal XML-RPC codec for the index's `search` method.
//!
//! Only what the search call needs: encoding a single
//! `search({"name": [tokens...]}, "and")` request and decoding a
//! `methodResponse` (or `fault`) into a [`Value`] tree.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use pypi_search::SearchCandidate;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// A decoded XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    String(String),
    Int(i64),
    Boolean(bool),
    Double(f64),
    Nil,
    Array(Vec<Value>),
    Struct(Vec<(String, Value)>),
}
impl Value {
    pub(crate) fn member(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(members) => members.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub(crate) fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Encodes `search({"name": tokens}, "and")`.
pub(crate) fn encode_search(tokens: &[String]) -> String {
    let values: String =
        tokens.iter().map(|token| format!("<value><string>{}</string></value>", escape(token.as_str()))).collect();
    format!(
        concat!(
            "<?xml version=\"1.0\"?>",
            "<methodCall><methodName>search</methodName><params>",
            "<param><value><struct><member><name>name</name>",
            "<value><array><data>{}</data></array></value>",
            "</member></struct></value></param>",
            "<param><value><string>and</string></value></param>",
            "</params></methodCall>"
        ),
        values
    )
}

/// Decodes a search response into candidates, in the order returned.
///
/// Entries without a `name` are skipped; a missing or `<nil/>` summary
/// becomes `None`.
pub(crate) fn decode_search(xml: &str) -> Result<Vec<SearchCandidate>> {
    let Value::Array(items) = decode_response(xml)? else {
        exn::bail!(ErrorKind::Protocol("search result is not an array".to_string()));
    };
    let candidates = items
        .iter()
        .filter_map(|item| {
            let Some(name) = item.member("name").and_then(Value::as_str) else {
                tracing::warn!(?item, "Skipping search result without a name");
                return None;
            };
            let summary = item.member("summary").and_then(Value::as_str);
            Some(SearchCandidate::new(name, summary))
        })
        .collect();
    Ok(candidates)
}

/// Decodes a `methodResponse`, turning a `fault` into [`ErrorKind::Rpc`].
pub(crate) fn decode_response(xml: &str) -> Result<Value> {
    let mut parser = Parser::new(xml);
    parser.expect_start("methodResponse")?;
    match parser.next()? {
        Event::Start(e) if e.name().as_ref() == b"params" => {
            parser.expect_start("param")?;
            parser.expect_start("value")?;
            let value = parser.value()?;
            parser.expect_end("param")?;
            parser.expect_end("params")?;
            parser.expect_end("methodResponse")?;
            Ok(value)
        },
        Event::Start(e) if e.name().as_ref() == b"fault" => {
            parser.expect_start("value")?;
            let fault = parser.value()?;
            let code = match fault.member("faultCode") {
                Some(Value::Int(code)) => code.to_string(),
                _ => "?".to_string(),
            };
            let message = fault.member("faultString").and_then(Value::as_str).unwrap_or("unknown fault");
            exn::bail!(ErrorKind::Rpc(format!("{code}: {message}")));
        },
        other => exn::bail!(unexpected("params", &other)),
    }
}

fn unexpected(expected: &str, found: &Event<'_>) -> ErrorKind {
    ErrorKind::Protocol(format!("expected <{expected}>, found {found:?}"))
}

fn malformed(what: &str) -> ErrorKind {
    ErrorKind::Protocol(format!("malformed {what}"))
}

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
}
impl<'a> Parser<'a> {
    fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        Self { reader }
    }

    fn next(&mut self) -> Result<Event<'a>> {
        loop {
            match self.reader.read_event().or_raise(|| malformed("XML"))? {
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => continue,
                Event::Eof => exn::bail!(ErrorKind::Protocol("unexpected end of document".to_string())),
                event => return Ok(event),
            }
        }
    }

    fn expect_start(&mut self, tag: &str) -> Result<()> {
        match self.next()? {
            Event::Start(e) if e.name().as_ref() == tag.as_bytes() => Ok(()),
            other => exn::bail!(unexpected(tag, &other)),
        }
    }

    fn expect_end(&mut self, tag: &str) -> Result<()> {
        match self.next()? {
            Event::End(e) if e.name().as_ref() == tag.as_bytes() => Ok(()),
            other => exn::bail!(unexpected(&format!("/{tag}"), &other)),
        }
    }

    /// Collects text up to the closing `tag`.
    fn text(&mut self, tag: &str) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.next()? {
                Event::Text(t) => text.push_str(&t.unescape().or_raise(|| malformed("text"))?),
                Event::CData(c) => text.push_str(std::str::from_utf8(&c).or_raise(|| malformed("CDATA"))?),
                Event::End(e) if e.name().as_ref() == tag.as_bytes() => return Ok(text),
                other => exn::bail!(unexpected(&format!("/{tag}"), &other)),
            }
        }
    }

    /// Parses the contents of a `<value>` whose start tag was just consumed,
    /// including its end tag.
    fn value(&mut self) -> Result<Value> {
        let value = match self.next()? {
            // Untyped values are strings.
            Event::End(e) if e.name().as_ref() == b"value" => return Ok(Value::String(String::new())),
            Event::Text(t) => Value::String(t.unescape().or_raise(|| malformed("text"))?.into_owned()),
            Event::Empty(e) => match e.name().as_ref() {
                b"nil" => Value::Nil,
                b"string" => Value::String(String::new()),
                b"array" => Value::Array(Vec::new()),
                b"struct" => Value::Struct(Vec::new()),
                other => exn::bail!(ErrorKind::Protocol(format!(
                    "unexpected empty <{}>",
                    String::from_utf8_lossy(other)
                ))),
            },
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match tag.as_str() {
                    "string" | "dateTime.iso8601" | "base64" => Value::String(self.text(&tag)?),
                    "int" | "i4" | "i8" => {
                        Value::Int(self.text(&tag)?.trim().parse::<i64>().or_raise(|| malformed("integer"))?)
                    },
                    "double" => Value::Double(self.text(&tag)?.trim().parse::<f64>().or_raise(|| malformed("double"))?),
                    "boolean" => match self.text(&tag)?.trim() {
                        "1" => Value::Boolean(true),
                        "0" => Value::Boolean(false),
                        _ => exn::bail!(malformed("boolean")),
                    },
                    "nil" => {
                        self.expect_end("nil")?;
                        Value::Nil
                    },
                    "array" => Value::Array(self.array()?),
                    "struct" => Value::Struct(self.members()?),
                    _ => exn::bail!(ErrorKind::Protocol(format!("unknown value type <{tag}>"))),
                }
            },
            other => exn::bail!(unexpected("value", &other)),
        };
        self.expect_end("value")?;
        Ok(value)
    }

    fn array(&mut self) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        match self.next()? {
            Event::Empty(e) if e.name().as_ref() == b"data" => {},
            Event::Start(e) if e.name().as_ref() == b"data" => loop {
                match self.next()? {
                    Event::Start(e) if e.name().as_ref() == b"value" => values.push(self.value()?),
                    Event::Empty(e) if e.name().as_ref() == b"value" => values.push(Value::String(String::new())),
                    Event::End(e) if e.name().as_ref() == b"data" => break,
                    other => exn::bail!(unexpected("value", &other)),
                }
            },
            other => exn::bail!(unexpected("data", &other)),
        }
        self.expect_end("array")?;
        Ok(values)
    }

    fn members(&mut self) -> Result<Vec<(String, Value)>> {
        let mut members = Vec::new();
        loop {
            match self.next()? {
                Event::Start(e) if e.name().as_ref() == b"member" => {
                    self.expect_start("name")?;
                    let name = self.text("name")?;
                    let value = match self.next()? {
                        Event::Start(e) if e.name().as_ref() == b"value" => self.value()?,
                        Event::Empty(e) if e.name().as_ref() == b"value" => Value::String(String::new()),
                        other => exn::bail!(unexpected("value", &other)),
                    };
                    self.expect_end("member")?;
                    members.push((name, value));
                },
                Event::End(e) if e.name().as_ref() == b"struct" => return Ok(members),
                other => exn::bail!(unexpected("member", &other)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SEARCH_RESPONSE: &str = include_str!("../fixtures/search.xml");

    #[test]
    fn encodes_search_request() {
        let xml = encode_search(&["flask".to_string(), "<rest&>".to_string()]);
        assert!(xml.starts_with("<?xml version=\"1.0\"?><methodCall><methodName>search</methodName>"));
        assert!(xml.contains(
            "<array><data><value><string>flask</string></value><value><string>&lt;rest&amp;&gt;</string></value></data></array>"
        ));
        assert!(xml.ends_with("<param><value><string>and</string></value></param></params></methodCall>"));
    }

    #[test]
    fn encoded_request_is_well_formed() {
        let xml = encode_search(&["a".to_string()]);
        let mut reader = Reader::from_str(&xml);
        loop {
            match reader.read_event().unwrap() {
                Event::Eof => break,
                _ => continue,
            }
        }
    }

    #[test]
    fn decodes_search_fixture() {
        let candidates = decode_search(SEARCH_RESPONSE).unwrap();
        assert_eq!(
            candidates,
            vec![
                SearchCandidate::new("flask-restful", Some("Simple framework for creating REST APIs & flask extension")),
                SearchCandidate::new("flask", None::<String>),
                SearchCandidate::new("flask-restful", None::<String>),
                SearchCandidate::new("flask-login", Some("User session management for Flask")),
            ]
        );
    }

    #[rstest]
    #[case("<value><int>42</int></value>", Value::Int(42))]
    #[case("<value><i4>-7</i4></value>", Value::Int(-7))]
    #[case("<value><boolean>0</boolean></value>", Value::Boolean(false))]
    #[case("<value><double>1.5</double></value>", Value::Double(1.5))]
    #[case("<value>untyped</value>", Value::String("untyped".to_string()))]
    #[case("<value></value>", Value::String(String::new()))]
    #[case("<value><string/></value>", Value::String(String::new()))]
    #[case("<value><string><![CDATA[a<b]]></string></value>", Value::String("a<b".to_string()))]
    #[case("<value><nil/></value>", Value::Nil)]
    #[case("<value><array><data/></array></value>", Value::Array(vec![]))]
    #[case(
        "<value><array><data><value>a</value><value><int>1</int></value></data></array></value>",
        Value::Array(vec![Value::String("a".to_string()), Value::Int(1)])
    )]
    #[case(
        "<value><array><data><value/><value>b</value></data></array></value>",
        Value::Array(vec![Value::String(String::new()), Value::String("b".to_string())])
    )]
    #[case(
        "<value><struct><member><name>k</name><value/></member></struct></value>",
        Value::Struct(vec![("k".to_string(), Value::String(String::new()))])
    )]
    #[case(
        "<value><struct><member><name>k</name><value><nil/></value></member></struct></value>",
        Value::Struct(vec![("k".to_string(), Value::Nil)])
    )]
    fn decodes_values(#[case] value: &str, #[case] expected: Value) {
        let xml = format!("<?xml version='1.0'?><methodResponse><params><param>{value}</param></params></methodResponse>");
        assert_eq!(decode_response(&xml).unwrap(), expected);
    }

    #[test]
    fn fault_becomes_rpc_error() {
        let xml = r#"<?xml version="1.0"?>
            <methodResponse><fault><value><struct>
                <member><name>faultCode</name><value><int>1</int></value></member>
                <member><name>faultString</name><value><string>RuntimeError: search disabled</string></value></member>
            </struct></value></fault></methodResponse>"#;
        let err = decode_response(xml).unwrap_err();
        assert_eq!(*err, ErrorKind::Rpc("1: RuntimeError: search disabled".to_string()));
    }

    #[rstest]
    #[case("")]
    #[case("<html><body>Service Unavailable</body></html>")]
    #[case("<methodResponse><params><param><value><int>x</int></value></param></params></methodResponse>")]
    #[case("<methodResponse><params><param><value><array><data>")]
    #[case("<methodResponse><params><param><value><weird>1</weird></value></param></params></methodResponse>")]
    fn malformed_responses_are_protocol_errors(#[case] xml: &str) {
        let err = decode_response(xml).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Protocol(_)), "unexpected error: {err:?}");
    }

    #[test]
    fn non_array_search_result_is_rejected() {
        let xml = "<methodResponse><params><param><value><int>1</int></value></param></params></methodResponse>";
        assert!(matches!(&*decode_search(xml).unwrap_err(), ErrorKind::Protocol(_)));
    }
}
