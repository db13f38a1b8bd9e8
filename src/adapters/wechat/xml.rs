//! Flat `<xml>` payloads used by the WeChat Pay v2 API.

use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;

use super::signature::Params;
use crate::ports::PaymentError;

/// Renders `params` as `<xml><k><![CDATA[v]]></k>...</xml>`.
pub fn to_xml(params: &Params) -> String {
    let mut xml = String::from("<xml>");
    for (key, value) in params {
        xml.push('<');
        xml.push_str(key);
        xml.push_str("><![CDATA[");
        xml.push_str(&value.replace("]]>", "]]]]><![CDATA[>"));
        xml.push_str("]]></");
        xml.push_str(key);
        xml.push('>');
    }
    xml.push_str("</xml>");
    xml
}

/// Reads the direct children of the root element into a map.
///
/// Text and CDATA content are both accepted; deeper nesting is ignored.
pub fn from_xml(xml: &str) -> Result<Params, PaymentError> {
    let mut reader = XmlReader::from_str(xml);
    let mut buf = Vec::new();
    let mut params = Params::new();
    let mut depth = 0usize;
    let mut field: Option<(String, String)> = None;
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                match depth {
                    1 => saw_root = true,
                    2 => {
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        field = Some((name, String::new()));
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) if depth == 1 => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                params.insert(name, String::new());
            }
            Ok(Event::Text(t)) if depth == 2 => {
                let text = t
                    .unescape()
                    .map_err(|e| PaymentError::protocol(e.to_string()))?;
                if let Some((_, value)) = field.as_mut() {
                    value.push_str(&text);
                }
            }
            Ok(Event::CData(c)) if depth == 2 => {
                let bytes = c.into_inner();
                if let Some((_, value)) = field.as_mut() {
                    value.push_str(&String::from_utf8_lossy(&bytes));
                }
            }
            Ok(Event::End(_)) => {
                if depth == 2 {
                    if let Some((name, value)) = field.take() {
                        params.insert(name, value);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(PaymentError::protocol(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(PaymentError::protocol("missing root element"));
    }
    Ok(params)
}
