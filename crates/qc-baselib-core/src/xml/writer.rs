//! Document model to XML text.

use super::CodecError;
use crate::configuration::{CheckerBundleConfig, Configuration};
use crate::element::{DomainSpecificInfo, XmlElement};
use crate::location::{Location, LocationGroup};
use crate::result::{Checker, CheckerBundle, CheckerResults, Issue};
use crate::settings::WriterSettings;
use crate::types::{format_float, CheckerStatus, ParamList, Severity};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt;

pub(crate) fn write_result(
    doc: &CheckerResults,
    settings: &WriterSettings,
) -> Result<String, CodecError> {
    emit(&result_tree(doc), settings)
}

pub(crate) fn write_configuration(
    config: &Configuration,
    settings: &WriterSettings,
) -> Result<String, CodecError> {
    emit(&configuration_tree(config), settings)
}

fn emit(root: &XmlElement, settings: &WriterSettings) -> Result<String, CodecError> {
    let mut writer = if settings.indent > 0 {
        Writer::new_with_indent(Vec::new(), b' ', settings.indent)
    } else {
        Writer::new(Vec::new())
    };
    if settings.xml_declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_error)?;
    }
    write_element(&mut writer, root)?;
    let mut text = String::from_utf8(writer.into_inner()).map_err(write_error)?;
    text.push('\n');
    Ok(text)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), CodecError> {
    check_name("element", element.name())?;
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        check_name("attribute", key)?;
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if element.children().is_empty() && element.text().is_none() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }
    writer.write_event(Event::Start(start)).map_err(write_error)?;
    if let Some(text) = element.text() {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_error)?;
    }
    for child in element.children() {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name())))
        .map_err(write_error)
}

/// Checks a name against the XML `Name` production.
fn check_name(kind: &str, name: &str) -> Result<(), CodecError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || matches!(c, '_' | ':'))
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.' | '\u{b7}'));
    if valid {
        Ok(())
    } else {
        Err(CodecError::Write {
            message: format!("invalid {kind} name `{name}`"),
        })
    }
}

fn write_error(err: impl fmt::Display) -> CodecError {
    CodecError::Write {
        message: err.to_string(),
    }
}

// --- result document ---

fn result_tree(doc: &CheckerResults) -> XmlElement {
    let mut root = XmlElement::new("CheckerResults").with_attribute("version", doc.version());
    for bundle in doc.get_checker_bundle_results() {
        root.push_child(bundle_tree(bundle));
    }
    root
}

fn bundle_tree(bundle: &CheckerBundle) -> XmlElement {
    let mut element = XmlElement::new("CheckerBundle")
        .with_attribute("name", bundle.name())
        .with_attribute("build_date", bundle.build_date())
        .with_attribute("description", bundle.description())
        .with_attribute("version", bundle.version())
        .with_attribute("summary", bundle.summary());
    push_params(&mut element, bundle.params());
    for checker in bundle.checkers() {
        element.push_child(checker_tree(checker));
    }
    element
}

fn checker_tree(checker: &Checker) -> XmlElement {
    let mut element = XmlElement::new("Checker")
        .with_attribute("checkerId", checker.checker_id())
        .with_attribute("description", checker.description());
    if checker.status() != CheckerStatus::NotCompleted {
        element.set_attribute("status", checker.status().as_str());
    }
    element.set_attribute("summary", checker.summary());

    push_params(&mut element, checker.params());
    for rule in checker.addressed_rules() {
        element.push_child(
            XmlElement::new("AddressedRule").with_attribute("ruleUID", rule.to_string()),
        );
    }
    for issue in checker.issues() {
        element.push_child(issue_tree(issue));
    }
    for meta in checker.metadata() {
        element.push_child(
            XmlElement::new("Metadata")
                .with_attribute("key", meta.key.as_str())
                .with_attribute("value", meta.value.as_str())
                .with_attribute("description", meta.description.as_str()),
        );
    }
    element
}

fn issue_tree(issue: &Issue) -> XmlElement {
    let mut element = XmlElement::new("Issue")
        .with_attribute("issueId", issue.issue_id().to_string())
        .with_attribute("description", issue.description())
        .with_attribute("level", severity(issue.level()));
    if let Some(uid) = issue.rule_uid() {
        element.set_attribute("ruleUID", uid.to_string());
    }
    for group in issue.locations() {
        element.push_child(locations_tree(group));
    }
    for info in issue.domain_specific_info() {
        element.push_child(domain_specific_tree(info));
    }
    element
}

fn locations_tree(group: &LocationGroup) -> XmlElement {
    let mut element = XmlElement::new("Locations");
    if let Some(description) = group.description() {
        element.set_attribute("description", description);
    }
    for location in group.locations() {
        element.push_child(location_tree(location));
    }
    element
}

fn location_tree(location: &Location) -> XmlElement {
    let element = XmlElement::new(location.element_name());
    match location {
        Location::File(file) => {
            let mut element = element
                .with_attribute("row", file.row.to_string())
                .with_attribute("column", file.column.to_string());
            if let Some(file_type) = &file.file_type {
                element.set_attribute("fileType", file_type.as_str());
            }
            if let Some(description) = &file.description {
                element.set_attribute("description", description.as_str());
            }
            element
        }
        Location::Inertial(point) => element
            .with_attribute("x", format!("{:.6}", point.x))
            .with_attribute("y", format!("{:.6}", point.y))
            .with_attribute("z", format!("{:.6}", point.z)),
        Location::Road(road) => element
            .with_attribute("roadId", road.road_id.as_str())
            .with_attribute("s", format_float(road.s))
            .with_attribute("t", format_float(road.t)),
        Location::Xml(xml) => element.with_attribute("xpath", xml.xpath.as_str()),
    }
}

fn domain_specific_tree(info: &DomainSpecificInfo) -> XmlElement {
    info.elements().iter().cloned().fold(
        XmlElement::new("DomainSpecificInfo").with_attribute("name", info.name()),
        XmlElement::with_child,
    )
}

// --- configuration document ---

fn configuration_tree(config: &Configuration) -> XmlElement {
    let mut root = XmlElement::new("Config");
    push_params(&mut root, config.get_all_config_params());
    for bundle in config.get_checker_bundles() {
        root.push_child(bundle_config_tree(bundle));
    }
    for module in config.get_report_modules() {
        let mut element =
            XmlElement::new("ReportModule").with_attribute("application", module.application());
        push_params(&mut element, module.params());
        root.push_child(element);
    }
    root
}

fn bundle_config_tree(bundle: &CheckerBundleConfig) -> XmlElement {
    let mut element =
        XmlElement::new("CheckerBundle").with_attribute("application", bundle.application());
    push_params(&mut element, bundle.params());
    for checker in bundle.checkers() {
        let mut child = XmlElement::new("Checker")
            .with_attribute("checkerId", checker.checker_id())
            .with_attribute("minLevel", severity(checker.min_level()))
            .with_attribute("maxLevel", severity(checker.max_level()));
        push_params(&mut child, checker.params());
        element.push_child(child);
    }
    element
}

fn push_params(element: &mut XmlElement, params: &ParamList) {
    for param in params {
        element.push_child(
            XmlElement::new("Param")
                .with_attribute("name", param.name.as_str())
                .with_attribute("value", param.value.to_literal()),
        );
    }
}

fn severity(level: Severity) -> String {
    level.ordinal().to_string()
}
