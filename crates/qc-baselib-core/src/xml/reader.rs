//! Maps an [`XmlElement`] tree onto the document model.

use super::{CodecError, SchemaError};
use crate::configuration::Configuration;
use crate::element::XmlElement;
use crate::location::{
    FileLocation, InertialLocation, Location, LocationGroup, RoadLocation, XmlLocation,
};
use crate::result::CheckerResults;
use crate::rule::RuleUid;
use crate::types::{CheckerStatus, ParamValue, Severity};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

const RESULT_ROOT: &str = "CheckerResults";
const CONFIG_ROOT: &str = "Config";

/// An element together with its path from the document root.
struct Node<'a> {
    element: &'a XmlElement,
    path: String,
}

impl<'a> Node<'a> {
    fn root(element: &'a XmlElement) -> Self {
        Self {
            element,
            path: format!("/{}", element.name()),
        }
    }

    /// Descends into a child, keyed by its identifying attribute if any.
    fn child(&self, element: &'a XmlElement, key: Option<&str>) -> Node<'a> {
        let path = match key.and_then(|k| element.attribute(k)) {
            Some(id) => format!("{}/{}[{id}]", self.path, element.name()),
            None => format!("{}/{}", self.path, element.name()),
        };
        Node { element, path }
    }

    fn name(&self) -> &'a str {
        self.element.name()
    }

    fn optional(&self, attribute: &str) -> Option<&'a str> {
        self.element.attribute(attribute)
    }

    /// Optional attribute, empty when absent.
    fn text(&self, attribute: &str) -> &'a str {
        self.optional(attribute).unwrap_or_default()
    }

    fn required(&self, attribute: &str) -> Result<&'a str, SchemaError> {
        self.optional(attribute)
            .ok_or_else(|| SchemaError::MissingAttribute {
                element: self.name().to_string(),
                attribute: attribute.to_string(),
                path: self.path.clone(),
            })
    }

    fn parsed<T>(&self, attribute: &str) -> Result<T, SchemaError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.required(attribute)?;
        raw.trim()
            .parse()
            .map_err(|e: T::Err| self.invalid(attribute, raw, e.to_string()))
    }

    fn severity(&self, attribute: &str) -> Result<Severity, SchemaError> {
        let raw = self.required(attribute)?;
        raw.trim()
            .parse::<i64>()
            .ok()
            .and_then(Severity::from_ordinal)
            .ok_or_else(|| {
                self.invalid(
                    attribute,
                    raw,
                    "expected a severity ordinal between 1 and 3".to_string(),
                )
            })
    }

    fn rule_uid(&self, raw: &str) -> Result<RuleUid, SchemaError> {
        RuleUid::parse(raw).map_err(|e| self.invalid("ruleUID", raw, e.to_string()))
    }

    fn invalid(&self, attribute: &str, value: &str, reason: String) -> SchemaError {
        SchemaError::InvalidValue {
            element: self.name().to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
            reason,
            path: self.path.clone(),
        }
    }

    fn param(&self) -> Result<(&'a str, ParamValue), SchemaError> {
        let name = self.required("name")?;
        Ok((name, ParamValue::parse_literal(self.text("value"))))
    }

    fn skip(&self, child: &XmlElement) {
        warn!(element = child.name(), parent = %self.path, "ignoring unknown element");
    }
}

fn expect_root<'a>(root: &'a XmlElement, expected: &str) -> Result<Node<'a>, SchemaError> {
    let node = Node::root(root);
    if root.name() != expected {
        return Err(SchemaError::UnexpectedRoot {
            element: root.name().to_string(),
            expected: expected.to_string(),
            path: node.path,
        });
    }
    Ok(node)
}

// --- result document ---

pub(crate) fn read_result(root: &XmlElement) -> Result<CheckerResults, CodecError> {
    let node = expect_root(root, RESULT_ROOT)?;
    let mut doc = CheckerResults::with_version(node.required("version")?);
    for child in root.children() {
        match child.name() {
            "CheckerBundle" => read_bundle(&mut doc, &node.child(child, Some("name")))?,
            _ => node.skip(child),
        }
    }
    Ok(doc)
}

fn read_bundle(doc: &mut CheckerResults, node: &Node<'_>) -> Result<(), CodecError> {
    let name = node.required("name")?;
    doc.register_checker_bundle(
        name,
        node.text("build_date"),
        node.text("description"),
        node.text("version"),
        node.text("summary"),
    )?;
    for child in node.element.children() {
        match child.name() {
            "Param" => {
                let (param, value) = node.child(child, Some("name")).param()?;
                doc.set_checker_bundle_param(name, param, value)?;
            }
            "Checker" => read_checker(doc, name, &node.child(child, Some("checkerId")))?,
            _ => node.skip(child),
        }
    }
    Ok(())
}

fn read_checker(doc: &mut CheckerResults, bundle: &str, node: &Node<'_>) -> Result<(), CodecError> {
    let checker_id = node.required("checkerId")?;
    doc.register_checker(
        bundle,
        checker_id,
        node.text("description"),
        node.text("summary"),
    )?;
    if let Some(raw) = node.optional("status") {
        let status = CheckerStatus::from_name(raw).ok_or_else(|| {
            node.invalid(
                "status",
                raw,
                "expected not-completed, completed, skipped or error".to_string(),
            )
        })?;
        doc.set_checker_status(bundle, checker_id, status)?;
    }
    for child in node.element.children() {
        match child.name() {
            "Param" => {
                let (param, value) = node.child(child, Some("name")).param()?;
                doc.set_checker_param(bundle, checker_id, param, value)?;
            }
            "AddressedRule" => {
                let rule = node.child(child, None);
                let uid = rule.rule_uid(rule.required("ruleUID")?)?;
                doc.register_rule_uid(bundle, checker_id, &uid)?;
            }
            "Issue" => read_issue(doc, bundle, checker_id, &node.child(child, Some("issueId")))?,
            "Metadata" => {
                let meta = node.child(child, Some("key"));
                doc.add_metadata(
                    bundle,
                    checker_id,
                    meta.required("key")?,
                    meta.text("value"),
                    meta.text("description"),
                )?;
            }
            _ => node.skip(child),
        }
    }
    Ok(())
}

fn read_issue(
    doc: &mut CheckerResults,
    bundle: &str,
    checker_id: &str,
    node: &Node<'_>,
) -> Result<(), CodecError> {
    let issue_id: u64 = node.parsed("issueId")?;
    let level = node.severity("level")?;
    let rule_uid = node
        .optional("ruleUID")
        .map(|raw| node.rule_uid(raw))
        .transpose()?;
    doc.register_issue_with_id(
        bundle,
        checker_id,
        issue_id,
        node.text("description"),
        level,
        rule_uid,
    )?;
    for child in node.element.children() {
        match child.name() {
            "Locations" => {
                let group = read_locations(&node.child(child, None))?;
                doc.add_location_group(bundle, checker_id, issue_id, group)?;
            }
            "DomainSpecificInfo" => {
                let name = node.child(child, Some("name")).required("name")?;
                let info = doc.add_domain_specific_info(bundle, checker_id, issue_id, name)?;
                for element in child.children() {
                    info.push(element.clone());
                }
            }
            _ => node.skip(child),
        }
    }
    Ok(())
}

fn read_locations(node: &Node<'_>) -> Result<LocationGroup, SchemaError> {
    let mut group = LocationGroup::new(node.optional("description").map(str::to_string));
    for child in node.element.children() {
        let entry = node.child(child, None);
        let location: Location = match child.name() {
            "FileLocation" => FileLocation {
                row: entry.parsed("row")?,
                column: entry.parsed("column")?,
                file_type: entry.optional("fileType").map(str::to_string),
                description: entry.optional("description").map(str::to_string),
            }
            .into(),
            "InertialLocation" => InertialLocation::new(
                entry.parsed("x")?,
                entry.parsed("y")?,
                entry.parsed("z")?,
            )
            .into(),
            "RoadLocation" => RoadLocation::new(
                entry.required("roadId")?,
                entry.parsed("s")?,
                entry.parsed("t")?,
            )
            .into(),
            "XMLLocation" => XmlLocation::new(entry.required("xpath")?).into(),
            _ => {
                node.skip(child);
                continue;
            }
        };
        group.push(location);
    }
    if group.is_empty() {
        return Err(SchemaError::MissingElement {
            element: node.name().to_string(),
            child: "a location entry".to_string(),
            path: node.path.clone(),
        });
    }
    Ok(group)
}

// --- configuration document ---

pub(crate) fn read_configuration(root: &XmlElement) -> Result<Configuration, CodecError> {
    let node = expect_root(root, CONFIG_ROOT)?;
    let mut config = Configuration::new();
    for child in root.children() {
        match child.name() {
            "Param" => {
                let (name, value) = node.child(child, Some("name")).param()?;
                config.set_config_param(name, value);
            }
            "CheckerBundle" => {
                read_bundle_config(&mut config, &node.child(child, Some("application")))?;
            }
            "ReportModule" => {
                let module = node.child(child, Some("application"));
                let application = module.required("application")?;
                config.register_report_module(application)?;
                for param in child.children() {
                    if param.name() != "Param" {
                        module.skip(param);
                        continue;
                    }
                    let (name, value) = module.child(param, Some("name")).param()?;
                    config.set_report_module_param(application, name, value)?;
                }
            }
            _ => node.skip(child),
        }
    }
    Ok(config)
}

fn read_bundle_config(config: &mut Configuration, node: &Node<'_>) -> Result<(), CodecError> {
    let application = node.required("application")?;
    config.register_checker_bundle(application)?;
    for child in node.element.children() {
        match child.name() {
            "Param" => {
                let (name, value) = node.child(child, Some("name")).param()?;
                config.set_checker_bundle_param(application, name, value)?;
            }
            "Checker" => {
                let checker = node.child(child, Some("checkerId"));
                let checker_id = checker.required("checkerId")?;
                config.register_checker(
                    application,
                    checker_id,
                    checker.severity("minLevel")?,
                    checker.severity("maxLevel")?,
                )?;
                for param in child.children() {
                    if param.name() != "Param" {
                        checker.skip(param);
                        continue;
                    }
                    let (name, value) = checker.child(param, Some("name")).param()?;
                    config.set_checker_param(application, checker_id, name, value)?;
                }
            }
            _ => node.skip(child),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::tree;

    fn result(xml: &str) -> Result<CheckerResults, CodecError> {
        read_result(&tree::parse(xml).unwrap())
    }

    fn schema_error(xml: &str) -> SchemaError {
        match result(xml) {
            Err(CodecError::Schema(err)) => err,
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    // --- defaults ---

    #[test]
    fn absent_optional_fields_take_defaults() {
        let doc = result(
            r#"<CheckerResults version="1.0.0">
                 <CheckerBundle name="B"><Checker checkerId="C"/></CheckerBundle>
               </CheckerResults>"#,
        )
        .unwrap();
        let bundle = doc.get_checker_bundle_result("B").unwrap();
        assert_eq!(bundle.summary(), "");
        assert_eq!(bundle.build_date(), "");
        let checker = bundle.checker("C").unwrap();
        assert_eq!(checker.description(), "");
        assert_eq!(checker.status(), CheckerStatus::NotCompleted);
    }

    #[test]
    fn unknown_attributes_and_elements_are_ignored() {
        let doc = result(
            r#"<CheckerResults version="1.0.0" extra="x">
                 <Unknown/>
                 <CheckerBundle name="B" color="red"><Checker checkerId="C"><Foo/></Checker></CheckerBundle>
               </CheckerResults>"#,
        )
        .unwrap();
        assert_eq!(doc.get_checker_ids("B"), vec!["C"]);
    }

    #[test]
    fn document_without_bundles_is_accepted() {
        let doc = result(r#"<CheckerResults version="0.0.1"/>"#).unwrap();
        assert!(doc.get_checker_bundle_names().is_empty());
    }

    // --- rules ---

    #[test]
    fn registry_is_populated_on_read() {
        let doc = result(
            r#"<CheckerResults version="1.0.0">
                 <CheckerBundle name="B"><Checker checkerId="C">
                   <AddressedRule ruleUID="a.b:x:1.0:r.one"/>
                   <Issue issueId="0" description="d" level="1" ruleUID="a.b:x:1.0:r.two"/>
                 </Checker></CheckerBundle>
               </CheckerResults>"#,
        )
        .unwrap();
        assert!(doc.get_rule_uid_descriptions("a.b:x:1.0:r.one").is_some());
        assert!(doc.get_rule_uid_descriptions("a.b:x:1.0:r.two").is_some());
        assert_eq!(doc.rules().len(), 2);
    }

    #[test]
    fn malformed_rule_uid_is_invalid_value() {
        let err = schema_error(
            r#"<CheckerResults version="1.0.0">
                 <CheckerBundle name="B"><Checker checkerId="C">
                   <AddressedRule ruleUID="not-a-rule"/>
                 </Checker></CheckerBundle>
               </CheckerResults>"#,
        );
        assert!(matches!(err, SchemaError::InvalidValue { .. }));
        assert_eq!(err.element(), "AddressedRule");
    }

    // --- schema violations ---

    #[test]
    fn wrong_root_is_rejected() {
        let err = schema_error("<Config/>");
        assert!(matches!(err, SchemaError::UnexpectedRoot { .. }));
        assert_eq!(err.element(), "Config");
    }

    #[test]
    fn missing_version_is_missing_attribute() {
        let err = schema_error("<CheckerResults/>");
        assert!(matches!(
            &err,
            SchemaError::MissingAttribute { attribute, .. } if attribute == "version"
        ));
    }

    #[test]
    fn unknown_status_is_invalid_value() {
        let err = schema_error(
            r#"<CheckerResults version="1"><CheckerBundle name="B">
                 <Checker checkerId="C" status="done"/>
               </CheckerBundle></CheckerResults>"#,
        );
        assert_eq!(err.element(), "Checker");
        assert_eq!(err.path(), "/CheckerResults/CheckerBundle[B]/Checker[C]");
    }

    #[test]
    fn out_of_range_level_names_issue() {
        let err = schema_error(
            r#"<CheckerResults version="1"><CheckerBundle name="B"><Checker checkerId="C">
                 <Issue issueId="0" description="d" level="4"/>
               </Checker></CheckerBundle></CheckerResults>"#,
        );
        assert_eq!(err.element(), "Issue");
        assert_eq!(
            err.path(),
            "/CheckerResults/CheckerBundle[B]/Checker[C]/Issue[0]"
        );
    }

    #[test]
    fn empty_locations_group_is_missing_element() {
        let err = schema_error(
            r#"<CheckerResults version="1"><CheckerBundle name="B"><Checker checkerId="C">
                 <Issue issueId="0" description="d" level="1"><Locations description="x"/></Issue>
               </Checker></CheckerBundle></CheckerResults>"#,
        );
        assert!(matches!(err, SchemaError::MissingElement { .. }));
        assert_eq!(err.element(), "Locations");
    }

    #[test]
    fn non_numeric_coordinate_is_invalid_value() {
        let err = schema_error(
            r#"<CheckerResults version="1"><CheckerBundle name="B"><Checker checkerId="C">
                 <Issue issueId="0" description="d" level="1">
                   <Locations><InertialLocation x="a" y="0" z="0"/></Locations>
                 </Issue>
               </Checker></CheckerBundle></CheckerResults>"#,
        );
        assert_eq!(err.element(), "InertialLocation");
    }

    #[test]
    fn duplicate_bundle_is_document_error() {
        let err = result(
            r#"<CheckerResults version="1">
                 <CheckerBundle name="B"/><CheckerBundle name="B"/>
               </CheckerResults>"#,
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::Document(_)));
    }

    // --- configuration ---

    #[test]
    fn configuration_reads_all_scopes() {
        let config = read_configuration(
            &tree::parse(
                r#"<Config>
                     <Param name="a" value="1"/>
                     <CheckerBundle application="B">
                       <Param name="b" value="x"/>
                       <Checker checkerId="C" minLevel="1" maxLevel="3">
                         <Param name="c" value="true"/>
                       </Checker>
                     </CheckerBundle>
                     <ReportModule application="R"><Param name="r" value="2.5"/></ReportModule>
                   </Config>"#,
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(config.get_config_param("a").unwrap(), &ParamValue::Int(1));
        assert_eq!(config.get_checker_bundle_param("B", "b").unwrap().as_str(), Some("x"));
        assert_eq!(
            config.get_checker_param("B", "C", "c").unwrap(),
            &ParamValue::Bool(true)
        );
        assert_eq!(
            config.get_report_module_param("R", "r").unwrap(),
            &ParamValue::Float(2.5)
        );
        let checker = config.get_checker("B", "C").unwrap();
        assert_eq!(checker.max_level(), Severity::Information);
    }

    #[test]
    fn configuration_checker_requires_levels() {
        let err = read_configuration(
            &tree::parse(
                r#"<Config><CheckerBundle application="B"><Checker checkerId="C" minLevel="1"/></CheckerBundle></Config>"#,
            )
            .unwrap(),
        )
        .unwrap_err();
        match err {
            CodecError::Schema(err) => assert_eq!(err.element(), "Checker"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }
}
