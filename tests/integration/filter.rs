//! Member filter parsing and evaluation (RFC 7644 §3.4.2.2).

use crate::common::fixtures::*;
use crate::common::init_logging;
use scim_patch::filter::{CompareOp, FieldRef, Filter, FilterEvaluator, Filterable};
use scim_patch::resource::value_objects::{GroupMember, TenantClaim};
use scim_patch::{PatchConfig, UnknownAttributePolicy};
use serde_json::{Value, json};

/// A record with every field kind the evaluator supports.
struct Grant {
    value: i64,
    scope: Option<&'static str>,
    token: Option<&'static str>,
    enabled: Option<bool>,
    expires: Option<chrono::DateTime<chrono::Utc>>,
}

impl Filterable for Grant {
    fn resolve_field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "value" => Some(FieldRef::Integer(Some(self.value))),
            "scope" => Some(FieldRef::string(self.scope)),
            "token" => Some(FieldRef::case_exact_string(self.token)),
            "enabled" => Some(FieldRef::Boolean(self.enabled)),
            "expires" => Some(FieldRef::DateTime(self.expires)),
            _ => None,
        }
    }
}

fn grant() -> Grant {
    Grant {
        value: 1,
        scope: Some("read"),
        token: Some("XyZ"),
        enabled: Some(true),
        expires: Some("2030-06-01T00:00:00Z".parse().unwrap()),
    }
}

fn matches(expression: &str, record: &impl Filterable) -> bool {
    FilterEvaluator::new()
        .evaluate(&Filter::parse(expression).unwrap(), record)
        .unwrap()
}

#[test]
fn test_empty_logical_expressions() {
    init_logging();
    let evaluator = FilterEvaluator::new();
    assert!(evaluator.evaluate(&Filter::and(vec![]), &grant()).unwrap());
    assert!(!evaluator.evaluate(&Filter::or(vec![]), &grant()).unwrap());
}

#[test]
fn test_null_comparisons() {
    init_logging();
    let evaluator = FilterEvaluator::new();
    let record = grant();
    assert!(!evaluator.evaluate(&Filter::eq("value", Value::Null), &record).unwrap());
    assert!(evaluator.evaluate(&Filter::ne("value", Value::Null), &record).unwrap());

    let unassigned = Grant {
        scope: Some(""),
        ..grant()
    };
    assert!(matches("scope eq null", &unassigned));
    assert!(!matches("scope pr", &unassigned));
    assert!(matches(r#"scope ne "read""#, &unassigned));
}

#[test]
fn test_operators_on_each_field_kind() {
    init_logging();
    let record = grant();
    assert!(matches("value eq 1 and value ge 1 and value lt 2", &record));
    assert!(matches(r#"value eq "1""#, &record));
    assert!(matches(r#"scope eq "READ" and scope sw "re" and scope ew "AD""#, &record));
    assert!(matches(r#"token eq "XyZ" and not (token eq "xyz")"#, &record));
    assert!(matches("enabled eq true and enabled ne false", &record));
    assert!(matches(r#"expires gt "2030-01-01T00:00:00Z""#, &record));
    assert!(matches(r#"expires eq "2030-06-01T02:00:00+02:00""#, &record));
}

#[test]
fn test_illegal_expressions_are_invalid_filter() {
    init_logging();
    let evaluator = FilterEvaluator::new();
    for expression in [
        "enabled gt true",
        r#"value sw "1""#,
        r#"expires co "2030""#,
        r#"value eq "one""#,
        r#"expires lt "yesterday""#,
        "scope lt null",
        r#"grants[scope eq "read"]"#,
    ] {
        let filter = Filter::parse(expression).unwrap();
        assert_scim_type!(evaluator.evaluate(&filter, &grant()), "invalidFilter");
    }
}

#[test]
fn test_unknown_attributes_follow_policy() {
    init_logging();
    let filter = Filter::compare(CompareOp::Eq, "nickName", "babs");
    let claim = claim(ALICE, "Alice", "read");

    let permissive = FilterEvaluator::from_config(&PatchConfig::default());
    assert!(!permissive.evaluate(&filter, &claim).unwrap());
    assert!(permissive.evaluate(&Filter::not(Filter::present("nickName")), &claim).unwrap());

    let strict = FilterEvaluator::with_policy(UnknownAttributePolicy::Strict);
    assert_scim_type!(strict.evaluate(&filter, &claim), "invalidFilter");
}

#[test]
fn test_member_types_expose_their_fields() {
    init_logging();
    let member = GroupMember::new(EVE, Some("Eve".to_string()));
    assert!(matches(r#"value eq 5 and display eq "EVE" and type eq "User""#, &member));
    assert!(!matches(r#"type eq "user""#, &member));

    let claim = TenantClaim::new(BOB, None, Some("write".to_string()));
    assert!(matches(r#"scope eq "write" and not (display pr)"#, &claim));

    let email = email("bjensen@example.com", "work");
    assert!(matches(r#"value ew "@EXAMPLE.COM" and type eq "work""#, &email));
}

#[test]
fn test_parsed_filters_render_back() {
    init_logging();
    let filter = Filter::parse(r#"(scope eq "read" or scope eq "write") and not (value gt 3)"#)
        .unwrap();
    assert_eq!(
        filter.to_string(),
        r#"(scope eq "read" or scope eq "write") and not (value gt 3)"#
    );
    assert_eq!(
        Filter::parse(&filter.to_string()).unwrap(),
        filter,
        "rendered filter must parse to the same tree"
    );
    assert_eq!(
        Filter::parse(r#"emails[type eq "work"] and active eq true"#)
            .unwrap()
            .to_string(),
        r#"emails[type eq "work"] and active eq true"#
    );
}

#[test]
fn test_parse_errors() {
    init_logging();
    for expression in [
        "",
        "value",
        "value eq",
        "value zz 1",
        r#"(scope eq "read""#,
        r#"scope eq "read" and"#,
        r#"scope eq 'read'"#,
    ] {
        assert_scim_type!(Filter::parse(expression), "invalidFilter");
    }
    assert_eq!(
        Filter::parse("VALUE EQ 1 AND SCOPE PR").unwrap(),
        Filter::and(vec![Filter::eq("VALUE", json!(1)), Filter::present("SCOPE")])
    );
}
