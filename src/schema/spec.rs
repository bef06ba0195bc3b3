//! Typed description of an NWB extension namespace
//!
//! These mirror the group, dataset and attribute specs an NWB namespace is
//! written in, so a namespace can be built in code and exported as JSON.

use crate::error::Result;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// How many instances of a group or dataset may appear in its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantity {
    #[serde(rename = "?")]
    ZeroOrOne,
    #[serde(rename = "*")]
    ZeroOrMany,
    #[serde(rename = "+")]
    OneOrMany,
}

/// Data type of an attribute or dataset: a primitive such as `text` or
/// `numeric`, or an object reference to another type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DType {
    Primitive(String),
    Reference { target_type: String, reftype: String },
}

impl DType {
    pub fn object_reference(target_type: impl Into<String>) -> Self {
        DType::Reference {
            target_type: target_type.into(),
            reftype: "object".to_string(),
        }
    }
}

impl From<&str> for DType {
    fn from(value: &str) -> Self {
        DType::Primitive(value.to_string())
    }
}

/// Allowed shapes; `None` marks an axis of any length.
pub type Shapes = Vec<Vec<Option<usize>>>;

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct AttributeSpec {
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub doc: String,
    #[builder(into)]
    pub dtype: DType,
    #[builder(default = true)]
    #[serde(default = "default_required")]
    pub required: bool,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shape: Shapes,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dims: Vec<Vec<String>>,
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct DatasetSpec {
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[builder(into)]
    pub doc: String,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neurodata_type_inc: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtype: Option<DType>,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shape: Shapes,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dims: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
}

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct GroupSpec {
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neurodata_type_def: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neurodata_type_inc: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[builder(into)]
    pub doc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSpec>,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datasets: Vec<DatasetSpec>,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupSpec>,
}

impl GroupSpec {
    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn dataset(&self, name: &str) -> Option<&DatasetSpec> {
        self.datasets
            .iter()
            .find(|d| d.name.as_deref() == Some(name))
    }

    /// Nested groups that include the given type
    pub fn includes(&self, type_name: &str) -> bool {
        self.groups
            .iter()
            .any(|g| g.neurodata_type_inc.as_deref() == Some(type_name))
    }
}

/// Types pulled in from another namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInclude {
    pub namespace: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct NamespaceSpec {
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub doc: String,
    #[builder(into)]
    pub version: String,
    #[builder(default)]
    pub author: Vec<String>,
    #[builder(default)]
    pub contact: Vec<String>,
    #[builder(default)]
    #[serde(default)]
    pub includes: Vec<TypeInclude>,
    #[builder(default)]
    #[serde(default)]
    pub data_types: Vec<GroupSpec>,
}

impl NamespaceSpec {
    /// Look up a data type defined by this namespace
    pub fn data_type(&self, type_name: &str) -> Option<&GroupSpec> {
        self.data_types
            .iter()
            .find(|g| g.neurodata_type_def.as_deref() == Some(type_name))
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.data_types
            .iter()
            .filter_map(|g| g.neurodata_type_def.as_deref())
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_and_dtype_json() -> Result<()> {
        let dataset = DatasetSpec::builder()
            .name("series")
            .doc("referenced series")
            .dtype(DType::object_reference("PhotostimulationSeries"))
            .quantity(Quantity::ZeroOrOne)
            .build();

        let json = serde_json::to_value(&dataset)?;
        assert_eq!(json["quantity"], "?");
        assert_eq!(json["dtype"]["target_type"], "PhotostimulationSeries");
        assert!(json.get("shape").is_none());

        let back: DatasetSpec = serde_json::from_value(json)?;
        assert_eq!(back, dataset);
        Ok(())
    }

    #[test]
    fn test_attribute_defaults() -> Result<()> {
        let attribute: AttributeSpec =
            serde_json::from_str(r#"{"name": "format", "doc": "format", "dtype": "text"}"#)?;
        assert!(attribute.required);
        assert_eq!(attribute.dtype, DType::from("text"));
        Ok(())
    }
}
