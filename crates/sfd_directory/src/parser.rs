//! Deserialization of the `GetGameServers` SOAP response.
//!
//! Elements are matched on their resolved namespace and local name, so the
//! prefixes chosen by the service do not matter. Every field falls back to a
//! default when missing or unparsable; a bad field never drops its record.

use std::collections::HashMap;
use std::str::FromStr;

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use tracing::debug;

use crate::error::DirectoryError;
use crate::server::{Server, ServerBuilder};

pub const SOAP12_ENVELOPE_NAMESPACE: &str = "http://www.w3.org/2003/05/soap-envelope";
pub const SFD_NAMESPACE: &str = "https://mythologicinteractive.com/Games/SFD/";

const RESULT_TAG: &str = "GetGameServersResult";
const SERVERS_TAG: &str = "Servers";
const SERVER_TAG: &str = "SFDGameServer";

#[derive(Debug)]
struct Frame {
    in_service_ns: bool,
    name: String,
}

impl Frame {
    fn is(&self, name: &str) -> bool {
        self.in_service_ns && self.name == name
    }
}

/// Text of the direct children of one `SFDGameServer` element.
#[derive(Debug, Default)]
struct RawServer {
    fields: HashMap<String, String>,
}

impl RawServer {
    fn set(&mut self, tag: String, text: String) {
        // first occurrence of a tag wins
        self.fields.entry(tag).or_insert(text);
    }

    fn text(&self, tag: &str) -> String {
        self.fields.get(tag).cloned().unwrap_or_default()
    }

    fn optional(&self, tag: &str) -> Option<String> {
        // empty and xsi:nil elements both mean "not set"
        self.fields.get(tag).filter(|v| !v.is_empty()).cloned()
    }

    fn number<T: FromStr + Default>(&self, tag: &str) -> T {
        self.fields
            .get(tag)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or_default()
    }

    fn flag(&self, tag: &str) -> bool {
        // surrounding whitespace is tolerated, anything but "true" is false
        self.fields
            .get(tag)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    fn into_server(self) -> Server {
        ServerBuilder::new(self.text("AddressIPv4"), self.number("Port"))
            .with_address_ipv6(self.optional("AddressIPv6"))
            .with_local_ip(self.optional("LIP"))
            .with_game_name(self.text("GameName"))
            .with_game_mode(self.number("GameMode"))
            .with_map_name(self.text("MapName"))
            .with_players(self.number("Players"), self.number("MaxPlayers"))
            .with_bots(self.number("Bots"))
            .with_password(self.flag("HasPassword"))
            .with_description(self.text("Description"))
            .with_version(self.text("Version"), self.number("VersionNr"))
            .with_application_instance(self.optional("ApplicationInstance"))
            .build()
    }
}

/// Field element currently collecting text.
#[derive(Debug)]
struct OpenField {
    depth: usize,
    tag: String,
    text: String,
}

fn in_service_ns(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == SFD_NAMESPACE.as_bytes())
}

fn local_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

/// Parses a directory response into servers, in document order.
///
/// A document without the `GetGameServersResult/Servers` wrapper yields an empty
/// list. Only a document that is not well-formed XML is an error.
pub fn parse_servers(xml: &str) -> Result<Vec<Server>, DirectoryError> {
    let mut reader = NsReader::from_str(xml);

    let mut stack: Vec<Frame> = Vec::new();
    let mut servers = Vec::new();
    let mut current: Option<(usize, RawServer)> = None;
    let mut field: Option<OpenField> = None;

    loop {
        match reader.read_resolved_event()? {
            (ns, Event::Start(e)) => {
                let frame = Frame {
                    in_service_ns: in_service_ns(&ns),
                    name: local_name(e.local_name().as_ref()),
                };
                let depth = stack.len();

                if current.is_none() && frame.is(SERVER_TAG) && under_servers_list(&stack) {
                    current = Some((depth, RawServer::default()));
                } else if frame.in_service_ns && opens_field(&current, depth) {
                    field = Some(OpenField {
                        depth,
                        tag: frame.name.clone(),
                        text: String::new(),
                    });
                }

                stack.push(frame);
            }
            (ns, Event::Empty(e)) => {
                let frame = Frame {
                    in_service_ns: in_service_ns(&ns),
                    name: local_name(e.local_name().as_ref()),
                };
                let depth = stack.len();

                if current.is_none() && frame.is(SERVER_TAG) && under_servers_list(&stack) {
                    servers.push(RawServer::default().into_server());
                } else if frame.in_service_ns && opens_field(&current, depth) {
                    if let Some((_, raw)) = current.as_mut() {
                        raw.set(frame.name, String::new());
                    }
                }
            }
            (_, Event::Text(t)) => {
                if let Some(open) = field.as_mut() {
                    if stack.len() == open.depth + 1 {
                        open.text.push_str(&t.unescape()?);
                    }
                }
            }
            (_, Event::CData(c)) => {
                if let Some(open) = field.as_mut() {
                    if stack.len() == open.depth + 1 {
                        open.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
            }
            (_, Event::End(_)) => {
                stack.pop();
                let depth = stack.len();

                if field.as_ref().is_some_and(|open| open.depth == depth) {
                    if let (Some(open), Some((_, raw))) = (field.take(), current.as_mut()) {
                        raw.set(open.tag, open.text);
                    }
                } else if current.as_ref().is_some_and(|(d, _)| *d == depth) {
                    if let Some((_, raw)) = current.take() {
                        servers.push(raw.into_server());
                    }
                }
            }
            (_, Event::Eof) => {
                if !stack.is_empty() {
                    return Err(DirectoryError::xml(format!(
                        "unexpected end of document, {} elements left open",
                        stack.len()
                    )));
                }
                break;
            }
            _ => {}
        }
    }

    debug!("Parsed {} servers from directory response", servers.len());
    Ok(servers)
}

/// True when an element opened at `depth` is a direct child of the current server.
fn opens_field(current: &Option<(usize, RawServer)>, depth: usize) -> bool {
    current
        .as_ref()
        .is_some_and(|(server_depth, _)| depth == server_depth + 1)
}

/// True when the innermost open elements are `GetGameServersResult/Servers`.
fn under_servers_list(stack: &[Frame]) -> bool {
    match stack {
        [.., result, servers] => result.is(RESULT_TAG) && servers.is(SERVERS_TAG),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(servers: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <soap:Body>
    <GetGameServersResponse xmlns="https://mythologicinteractive.com/Games/SFD/">
      <GetGameServersResult>
        <Servers>{servers}</Servers>
      </GetGameServersResult>
    </GetGameServersResponse>
  </soap:Body>
</soap:Envelope>"#
        )
    }

    #[test]
    fn test_full_record() {
        let xml = envelope(
            r#"<SFDGameServer>
                <AddressIPv4>203.0.113.7</AddressIPv4>
                <AddressIPv6>2001:db8::7</AddressIPv6>
                <LIP>192.168.1.20</LIP>
                <Port>10101</Port>
                <GameName>Rooftop &amp; Friends</GameName>
                <GameMode>3</GameMode>
                <MapName>Police Station</MapName>
                <Players>5</Players>
                <MaxPlayers>8</MaxPlayers>
                <Bots>2</Bots>
                <HasPassword>True</HasPassword>
                <Description>No camping</Description>
                <Version>v.1.3.7d</Version>
                <VersionNr>17</VersionNr>
                <ApplicationInstance>4f1c</ApplicationInstance>
            </SFDGameServer>"#,
        );

        let servers = parse_servers(&xml).unwrap();
        assert_eq!(servers.len(), 1);

        let s = &servers[0];
        assert_eq!(s.address_ipv4(), "203.0.113.7");
        assert_eq!(s.address_ipv6(), Some("2001:db8::7"));
        assert_eq!(s.local_ip(), Some("192.168.1.20"));
        assert_eq!(s.port(), 10101);
        assert_eq!(s.game_name(), "Rooftop & Friends");
        assert_eq!(s.game_mode(), 3);
        assert_eq!(s.game_mode_name(), "Campaign");
        assert_eq!(s.map_name(), "Police Station");
        assert_eq!(s.players(), 5);
        assert_eq!(s.max_players(), 8);
        assert_eq!(s.bots(), 2);
        assert!(s.has_password());
        assert_eq!(s.description(), "No camping");
        assert_eq!(s.version(), "v.1.3.7d");
        assert_eq!(s.version_nr(), 17);
        assert_eq!(s.application_instance(), Some("4f1c"));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let xml = envelope("<SFDGameServer><AddressIPv4>1.1.1.1</AddressIPv4></SFDGameServer>");

        let servers = parse_servers(&xml).unwrap();
        let s = &servers[0];

        assert_eq!(s.port(), 0);
        assert_eq!(s.game_mode(), 0);
        assert_eq!(s.players(), 0);
        assert_eq!(s.max_players(), 0);
        assert_eq!(s.bots(), 0);
        assert_eq!(s.version_nr(), 0);
        assert!(!s.has_password());
        assert_eq!(s.game_name(), "");
        assert_eq!(s.address_ipv6(), None);
        assert_eq!(s.local_ip(), None);
        assert_eq!(s.application_instance(), None);
    }

    #[test]
    fn test_unparsable_numbers_become_zero() {
        let xml = envelope(
            r#"<SFDGameServer>
                <Port>99999</Port>
                <Players>lots</Players>
                <MaxPlayers>-4</MaxPlayers>
                <Bots> 3 </Bots>
                <VersionNr></VersionNr>
                <HasPassword>yes</HasPassword>
            </SFDGameServer>"#,
        );

        let s = &parse_servers(&xml).unwrap()[0];
        assert_eq!(s.port(), 0);
        assert_eq!(s.players(), 0);
        assert_eq!(s.max_players(), 0);
        assert_eq!(s.bots(), 3);
        assert_eq!(s.version_nr(), 0);
        assert!(!s.has_password());
    }

    #[test]
    fn test_nil_optional_fields_are_none() {
        let xml = envelope(
            r#"<SFDGameServer>
                <AddressIPv6 xsi:nil="true" />
                <LIP></LIP>
                <ApplicationInstance/>
            </SFDGameServer>"#,
        );

        let s = &parse_servers(&xml).unwrap()[0];
        assert_eq!(s.address_ipv6(), None);
        assert_eq!(s.local_ip(), None);
        assert_eq!(s.application_instance(), None);
    }

    #[test]
    fn test_missing_wrapper_is_empty() {
        let xml = r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
  <soap:Body><GetGameServersResponse xmlns="https://mythologicinteractive.com/Games/SFD/" /></soap:Body>
</soap:Envelope>"#;

        assert!(parse_servers(xml).unwrap().is_empty());
        assert!(parse_servers("<root/>").unwrap().is_empty());
    }

    #[test]
    fn test_wrong_namespace_is_ignored() {
        let xml = r#"<Envelope><Body>
            <GetGameServersResult xmlns="urn:other"><Servers>
                <SFDGameServer><Port>1</Port></SFDGameServer>
            </Servers></GetGameServersResult>
        </Body></Envelope>"#;

        assert!(parse_servers(xml).unwrap().is_empty());
    }

    #[test]
    fn test_prefixed_service_namespace() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" xmlns:sfd="https://mythologicinteractive.com/Games/SFD/">
  <s:Body><sfd:GetGameServersResponse><sfd:GetGameServersResult><sfd:Servers>
    <sfd:SFDGameServer><sfd:Port>42</sfd:Port><Port>7</Port></sfd:SFDGameServer>
  </sfd:Servers></sfd:GetGameServersResult></sfd:GetGameServersResponse></s:Body>
</s:Envelope>"#;

        let servers = parse_servers(xml).unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].port(), 42);
    }

    #[test]
    fn test_document_order_and_first_tag_wins() {
        let xml = envelope(
            r#"<SFDGameServer><GameName>first</GameName><GameName>dup</GameName></SFDGameServer>
               <SFDGameServer><GameName>second</GameName></SFDGameServer>
               <SFDGameServer/>"#,
        );

        let servers = parse_servers(&xml).unwrap();
        let names: Vec<_> = servers.iter().map(|s| s.game_name()).collect();
        assert_eq!(names, vec!["first", "second", ""]);
    }

    #[test]
    fn test_nested_grandchildren_are_ignored() {
        let xml = envelope(
            r#"<SFDGameServer><GameName>outer<Extra>inner</Extra></GameName></SFDGameServer>"#,
        );

        let s = &parse_servers(&xml).unwrap()[0];
        assert_eq!(s.game_name(), "outer");
    }

    #[test]
    fn test_cdata_text() {
        let xml = envelope(
            r#"<SFDGameServer><Description><![CDATA[<b>bold</b> & more]]></Description></SFDGameServer>"#,
        );

        let s = &parse_servers(&xml).unwrap()[0];
        assert_eq!(s.description(), "<b>bold</b> & more");
    }

    #[test]
    fn test_truncated_document_is_error() {
        let xml = envelope(
            "<SFDGameServer><VersionNr>5</VersionNr></SFDGameServer><SFDGameServer><VersionNr>6",
        );
        let cut = &xml[..xml.find("<VersionNr>6").unwrap() + "<VersionNr>6".len()];

        let result = parse_servers(cut);
        assert!(matches!(result, Err(DirectoryError::Xml(_))));
        assert!(matches!(
            parse_servers("<Envelope><Body>"),
            Err(DirectoryError::Xml(_))
        ));
    }

    #[test]
    fn test_ill_formed_document_is_error() {
        let result = parse_servers("<Envelope><Body></Envelope>");
        assert!(matches!(result, Err(DirectoryError::Xml(_))));
    }
}
