//! DIDL-Lite document writer.
//!
//! The output shape is fixed by deployed control points: attribute order,
//! which attributes are omitted, and the `-1` sentinel encodings all
//! follow the wire format renderers already parse. Do not "clean up" the
//! serialization without checking against a real control point.

use dircast_common::xml::escape_text;
use std::fmt::Write;

const DIDL_LITE: &str = "DIDL-Lite";
const DIDL_NAMESPACE: &str = "xmlns=\"urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/\" \
     xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
     xmlns:upnp=\"urn:schemas-upnp-org:metadata-1-0/upnp/\"";

/// Incrementally builds one DIDL-Lite document.
pub struct DidlWriter {
    buf: String,
}

impl DidlWriter {
    pub fn new() -> Self {
        let mut buf = String::new();
        let _ = write!(buf, "<{} {}>", DIDL_LITE, DIDL_NAMESPACE);
        Self { buf }
    }

    /// Close the document and return it.
    pub fn finish(mut self) -> String {
        let _ = write!(self.buf, "</{}>", DIDL_LITE);
        self.buf
    }

    /// Append one `container` element.
    ///
    /// `child_count` is omitted when negative; `restricted` and
    /// `searchable` are omitted when `None`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_container(
        &mut self,
        id: i64,
        parent_id: i64,
        child_count: i64,
        restricted: Option<&str>,
        searchable: Option<&str>,
        title: &str,
        class: &str,
    ) {
        self.buf.push_str("<container");
        self.attr_value("id", id);
        self.attr_value("parentID", parent_id);
        if child_count >= 0 {
            self.attr_value("childCount", child_count);
        }
        self.attr_param("restricted", restricted);
        self.attr_param("searchable", searchable);
        self.buf.push('>');

        self.tag("upnp:class", class);
        self.tag("dc:title", &escape_text(title));

        self.buf.push_str("</container>");
    }

    /// Append one `item` element with its `res` resource.
    ///
    /// `size` is omitted when negative (metadata browses do not report
    /// it); the resource URL is the element text.
    #[allow(clippy::too_many_arguments)]
    pub fn add_item(
        &mut self,
        id: i64,
        parent_id: i64,
        restricted: Option<&str>,
        class: &str,
        title: &str,
        protocol_info: Option<&str>,
        size: i64,
        url: Option<&str>,
    ) {
        self.buf.push_str("<item");
        self.attr_value("id", id);
        self.attr_value("parentID", parent_id);
        self.attr_param("restricted", restricted);
        self.buf.push('>');

        self.tag("upnp:class", class);
        self.tag("dc:title", &escape_text(title));

        self.buf.push_str("<res");
        self.attr_param("protocolInfo", protocol_info);
        if size >= 0 {
            self.attr_value("size", size);
        }
        self.buf.push('>');
        if let Some(url) = url {
            self.buf.push_str(url);
        }
        self.buf.push_str("</res></item>");
    }

    fn attr_value(&mut self, name: &str, value: i64) {
        let _ = write!(self.buf, " {}=\"{}\"", name, value);
    }

    fn attr_param(&mut self, name: &str, value: Option<&str>) {
        if let Some(value) = value {
            let _ = write!(self.buf, " {}=\"{}\"", name, value);
        }
    }

    fn tag(&mut self, name: &str, value: &str) {
        let _ = write!(self.buf, "<{}>{}</{}>", name, value, name);
    }
}

impl Default for DidlWriter {
    fn default() -> Self {
        Self::new()
    }
}
