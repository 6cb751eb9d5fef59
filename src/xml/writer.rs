use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::Element;
use crate::error::Result;

const INDENT_SIZE: usize = 4;

/// Serializes a complete document: XML declaration followed by `root`,
/// indented with four spaces.
pub fn to_string(root: &Element) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(quick_xml::Error::from)?;
    write_element(&mut writer, root)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Serializes `element` without a declaration or indentation.
pub fn to_fragment(element: &Element) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, element)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(quick_xml::Error::from)?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(quick_xml::Error::from)?;
    if !element.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&element.text)))
            .map_err(quick_xml::Error::from)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(quick_xml::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_indented_document() {
        let function = Element::new("function")
            .with_attr("controlid", "unittest")
            .with_child(
                Element::new("getUserPermissions")
                    .with_child(Element::text_element("userId", "helloworld")),
            );

        let xml = to_string(&function).expect("serializes");
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <function controlid=\"unittest\">\n    \
             <getUserPermissions>\n        \
             <userId>helloworld</userId>\n    \
             </getUserPermissions>\n\
             </function>"
        );
    }

    #[test]
    fn empty_elements_self_close_and_text_is_escaped() {
        let query = Element::new("readByQuery")
            .with_child(Element::new("docparid"))
            .with_child(Element::text_element("query", "NAME = 'A&B' AND RECORDNO < 3"));

        let xml = to_fragment(&query).expect("serializes");
        assert_eq!(
            xml,
            "<readByQuery><docparid/><query>NAME = &apos;A&amp;B&apos; AND RECORDNO &lt; 3</query></readByQuery>"
        );
    }
}
