//! # SCIM PatchOp Validator
//!
//! A command-line utility for checking a PatchOp message against one of the
//! built-in resource schemas before sending it to a server.
//!
//! ## Overview
//!
//! For every operation in the message the validator reports:
//! - whether the operation is well formed (`op`, `path`, `value`)
//! - whether its target path resolves to a mutable attribute
//! - whether an embedded value filter parses, and whether the attributes it
//!   references are searchable sub-attributes of the target
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin patch-validator group patches/add-members.json
//! ```
//!
//! ## Output Examples
//!
//! ```text
//! Validating PatchOp file: patches/add-members.json (Group)
//!
//! [0] add members
//!   ✓ members -> members (collection)
//! [1] remove members[value eq 5]
//!   ✓ members -> members (collection)
//!   ✓ filter: value eq 5
//!     - members.value (searchable)
//!
//! Validation Summary:
//!   Valid operations: 2
//!   Invalid operations: 0
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: Every operation is valid
//! - `1`: One or more operations are invalid or the file could not be read

use scim_patch::filter::{AttributePath, Filter};
use scim_patch::patch::{PATCH_OP_SCHEMA, PatchOperation};
use scim_patch::schema::{AttributeSchema, ResourceType, SchemaRegistry};
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <resource-type> <patch-file>", args[0]);
        eprintln!();
        eprintln!("Resource types: user, group (role), tenant");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} group patches/add-members.json", args[0]);
        eprintln!("  {} tenant patches/remove-claims.json", args[0]);
        process::exit(1);
    }

    let Some(resource_type) = ResourceType::from_name(&args[1]) else {
        eprintln!("Error: unknown resource type '{}'", args[1]);
        process::exit(1);
    };

    let registry = match SchemaRegistry::new() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("❌ Failed to build schema registry: {}", e);
            process::exit(1);
        }
    };

    let path = Path::new(&args[2]);
    println!(
        "Validating PatchOp file: {} ({})",
        path.display(),
        resource_type
    );

    let operations = match load_operations(path) {
        Ok(operations) => operations,
        Err(e) => {
            eprintln!("❌ PatchOp message is invalid: {}", e);
            process::exit(1);
        }
    };

    let schema = registry.get(resource_type);
    let mut valid_count = 0;
    let mut error_count = 0;

    for (index, operation) in operations.iter().enumerate() {
        println!();
        if validate_operation(schema, index, operation) {
            valid_count += 1;
        } else {
            error_count += 1;
        }
    }

    println!("\nValidation Summary:");
    println!("  Valid operations: {}", valid_count);
    println!("  Invalid operations: {}", error_count);

    if error_count > 0 {
        process::exit(1);
    }
}

/// Read the message and return its raw operations, checking the
/// message-level fields.
fn load_operations(file_path: &Path) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file_path)?;
    let json_value: Value = serde_json::from_str(&content)?;

    let obj = json_value
        .as_object()
        .ok_or("PatchOp message must be a JSON object")?;

    let declares_schema = obj
        .get("schemas")
        .and_then(Value::as_array)
        .is_some_and(|schemas| schemas.iter().any(|s| s == PATCH_OP_SCHEMA));
    if !declares_schema {
        return Err(format!("'schemas' must contain {}", PATCH_OP_SCHEMA).into());
    }

    let operations = obj
        .get("Operations")
        .or_else(|| obj.get("operations"))
        .and_then(Value::as_array)
        .ok_or("PatchOp message missing required 'Operations' array")?;
    if operations.is_empty() {
        return Err("'Operations' must contain at least one operation".into());
    }

    Ok(operations.clone())
}

fn validate_operation(schema: &AttributeSchema, index: usize, raw: &Value) -> bool {
    let operation = match PatchOperation::from_json(raw) {
        Ok(operation) => operation,
        Err(e) => {
            println!("[{}] {}", index, raw);
            eprintln!("  ❌ {}", e);
            return false;
        }
    };
    println!("[{}] {}", index, operation);

    match &operation.path {
        Some(path) => validate_path(schema, path),
        None => match operation.value.as_ref().and_then(Value::as_object) {
            Some(object) => validate_object(schema, None, object),
            None => {
                eprintln!("  ❌ operation without a path requires an object value");
                false
            }
        },
    }
}

/// Check every key of a path-less value. Extension attributes are nested
/// under their schema URN.
fn validate_object(schema: &AttributeSchema, uri: Option<&str>, object: &Map<String, Value>) -> bool {
    object
        .iter()
        .filter(|(key, _)| uri.is_some() || !key.eq_ignore_ascii_case("schemas"))
        .map(|(key, value)| {
            let nested = value.as_object().filter(|_| {
                uri.is_none() && schema.schema_uris().iter().any(|u| u.eq_ignore_ascii_case(key))
            });
            if let Some(nested) = nested {
                return validate_object(schema, Some(key.as_str()), nested);
            }
            match AttributePath::parse(key) {
                Ok(path) => match uri {
                    Some(uri) => validate_path(schema, &path.with_schema(uri)),
                    None => validate_path(schema, &path),
                },
                Err(e) => {
                    eprintln!("  ❌ {}", e);
                    false
                }
            }
        })
        .fold(true, |valid, ok| valid && ok)
}

fn validate_path(schema: &AttributeSchema, path: &AttributePath) -> bool {
    let descriptor = match schema.resolve_mutable(path) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            eprintln!("  ❌ {}", e);
            return false;
        }
    };
    println!(
        "  ✓ {} -> {} ({:?})",
        descriptor.external_name, descriptor.internal_key, descriptor.kind
    );

    let Some(filter) = path.filter() else {
        return true;
    };
    println!("  ✓ filter: {}", filter);

    let mut attributes = Vec::new();
    collect_attributes(filter, &mut attributes);
    for attribute in attributes {
        let qualified = format!("{}.{}", descriptor.external_name, attribute.normalized());
        // Filters on member fields outside the searchable table are legal, but
        // only match under the permissive unknown-attribute policy
        match schema.resolve_searchable(&AttributePath::attribute(&qualified)) {
            Ok(_) => println!("    - {} (searchable)", qualified),
            Err(_) => println!("    - {} (not searchable)", qualified),
        }
    }
    true
}

fn collect_attributes<'a>(filter: &'a Filter, out: &mut Vec<&'a AttributePath>) {
    match filter {
        Filter::And(children) | Filter::Or(children) => {
            for child in children {
                collect_attributes(child, out);
            }
        }
        Filter::Not(child) => collect_attributes(child, out),
        other => out.extend(other.path()),
    }
}
