use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const NODE_ID: &str = "pagar_me";
pub const CREDENTIAL_NAME: &str = "pagarMeApi";

pub const RESOURCE_CREATE_ORDER: &str = "createOrder";
pub const OPERATION_POST: &str = "post";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer { min: i64, max: i64 },
}

/// A per-item field the operation reads before building its request.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub placeholder: Option<&'static str>,
    pub description: Option<&'static str>,
}

const CREATE_ORDER_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        name: "name",
        label: "Customer Name",
        kind: FieldKind::Text,
        placeholder: None,
        description: Some("The name of the customer"),
    },
    FieldDescriptor {
        name: "email",
        label: "Customer Email",
        kind: FieldKind::Text,
        placeholder: Some("name@email.com"),
        description: Some("The email of the customer"),
    },
    FieldDescriptor {
        name: "amount",
        label: "Item Amount",
        kind: FieldKind::Integer { min: 1, max: 999 },
        placeholder: None,
        description: Some("Item amount"),
    },
    FieldDescriptor {
        name: "code",
        label: "Item Code",
        kind: FieldKind::Text,
        placeholder: Some("0000000"),
        description: None,
    },
    FieldDescriptor {
        name: "description",
        label: "Item Description",
        kind: FieldKind::Text,
        placeholder: Some("Item details"),
        description: None,
    },
];

// (resource, operation) -> fields shown and required for that pair
const OPERATIONS: &[(&str, &str, &[FieldDescriptor])] =
    &[(RESOURCE_CREATE_ORDER, OPERATION_POST, CREATE_ORDER_FIELDS)];

pub fn fields_for(resource: &str, operation: &str) -> Option<&'static [FieldDescriptor]> {
    OPERATIONS
        .iter()
        .find(|(r, o, _)| *r == resource && *o == operation)
        .map(|(_, _, fields)| *fields)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PropertyOption {
    pub name: String,
    pub value: String,
    pub action: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct DisplayOptions {
    pub resource: Vec<String>,
    pub operation: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NumberOptions {
    pub min_value: i64,
    pub max_value: i64,
    pub number_step_size: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NodeProperty {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub property_type: String, // string, number, options
    pub options: Option<Vec<PropertyOption>>,
    pub default: Value,
    pub required: bool,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    pub number_options: Option<NumberOptions>,
    /// Shown only when the node is configured with one of these values.
    pub show: Option<DisplayOptions>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NodeType {
    pub id: String,
    pub label: String,
    pub category: String,
    pub description: Option<String>,
    pub version: u32,
    pub subtitle: String,
    pub credentials: Vec<String>,
    pub properties: Vec<NodeProperty>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CredentialProperty {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub default: String,
    pub required: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CredentialType {
    pub name: String,
    pub label: String,
    pub properties: Vec<CredentialProperty>,
}

fn show_for(resource: &str, operation: Option<&str>) -> DisplayOptions {
    DisplayOptions {
        resource: vec![resource.to_string()],
        operation: operation.map(|o| vec![o.to_string()]).unwrap_or_default(),
    }
}

fn field_property(field: &FieldDescriptor, resource: &str, operation: &str) -> NodeProperty {
    let (property_type, default, number_options) = match field.kind {
        FieldKind::Text => ("string", json!(""), None),
        FieldKind::Integer { min, max } => (
            "number",
            json!(min),
            Some(NumberOptions { min_value: min, max_value: max, number_step_size: 1 }),
        ),
    };

    NodeProperty {
        name: field.name.to_string(),
        label: field.label.to_string(),
        property_type: property_type.to_string(),
        options: None,
        default,
        required: true,
        placeholder: field.placeholder.map(str::to_string),
        description: field.description.map(str::to_string),
        number_options,
        show: Some(show_for(resource, Some(operation))),
    }
}

pub fn node_description() -> NodeType {
    let mut properties = vec![
        NodeProperty {
            name: "resource".to_string(),
            label: "Resource".to_string(),
            property_type: "options".to_string(),
            options: Some(vec![PropertyOption {
                name: "Create Order".to_string(),
                value: RESOURCE_CREATE_ORDER.to_string(),
                action: None,
                description: None,
            }]),
            default: json!(RESOURCE_CREATE_ORDER),
            required: true,
            placeholder: None,
            description: None,
            number_options: None,
            show: None,
        },
        NodeProperty {
            name: "operation".to_string(),
            label: "Operation".to_string(),
            property_type: "options".to_string(),
            options: Some(vec![PropertyOption {
                name: "Post".to_string(),
                value: OPERATION_POST.to_string(),
                action: Some("Create new order".to_string()),
                description: Some("Create a new order".to_string()),
            }]),
            default: json!(OPERATION_POST),
            required: true,
            placeholder: None,
            description: None,
            number_options: None,
            show: Some(show_for(RESOURCE_CREATE_ORDER, None)),
        },
    ];

    for (resource, operation, fields) in OPERATIONS {
        properties.extend(fields.iter().map(|f| field_property(f, resource, operation)));
    }

    NodeType {
        id: NODE_ID.to_string(),
        label: "Pagar.me".to_string(),
        category: "transform".to_string(),
        description: Some("Get data from Pagar.me API".to_string()),
        version: 1,
        subtitle: "{{ operation }}: {{ resource }}".to_string(),
        credentials: vec![CREDENTIAL_NAME.to_string()],
        properties,
    }
}

pub fn credential_description() -> CredentialType {
    CredentialType {
        name: CREDENTIAL_NAME.to_string(),
        label: "Pagar.me API".to_string(),
        properties: vec![CredentialProperty {
            name: "tokens".to_string(),
            label: "Tokens".to_string(),
            property_type: "string".to_string(),
            default: String::new(),
            required: true,
        }],
    }
}
