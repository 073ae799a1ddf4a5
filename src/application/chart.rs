//! Chart file model: the on-disk TOML description of an initial organization.
//!
//! ```toml
//! [root]
//! id = 1
//! name = "CEO"
//!
//! [[employees]]
//! id = 2
//! name = "E1"
//! supervisor = 1
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{DomainResult, EmployeeId, OrgBuilder, OrgEngine, RedoPolicy};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RootRecord {
    pub id: EmployeeId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub name: String,
    pub supervisor: EmployeeId,
}

/// Flat chart: a root plus one record per other employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChartFile {
    pub root: RootRecord,
    #[serde(default)]
    pub employees: Vec<EmployeeRecord>,
}

impl ChartFile {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Build an engine from the records, keeping their order.
    pub fn into_engine(self, policy: RedoPolicy) -> DomainResult<OrgEngine> {
        let mut builder = OrgBuilder::new(self.root.id, self.root.name).policy(policy);
        for e in self.employees {
            builder.add_employee(e.id, e.name, e.supervisor);
        }
        builder.build()
    }

    /// Flatten the engine's current tree in pre-order.
    ///
    /// Re-importing the result reproduces the same shape and child order.
    pub fn from_engine(engine: &OrgEngine) -> Self {
        let tree = engine.tree();
        let mut root = RootRecord {
            id: engine.root_id(),
            name: String::new(),
        };
        let mut employees = Vec::with_capacity(engine.len().saturating_sub(1));

        for (idx, node, _) in tree.iter() {
            match tree.parent_id(idx) {
                Some(supervisor) => employees.push(EmployeeRecord {
                    id: node.data.id,
                    name: node.data.name.clone(),
                    supervisor,
                }),
                None => root.name = node.data.name.clone(),
            }
        }

        Self { root, employees }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = r#"
[root]
id = 1
name = "CEO"

[[employees]]
id = 2
name = "E1"
supervisor = 1

[[employees]]
id = 3
name = "E2"
supervisor = 1
"#;

    #[test]
    fn test_parse_chart() {
        let chart = ChartFile::parse(CHART).unwrap();
        assert_eq!(chart.root.id, 1);
        assert_eq!(chart.employees.len(), 2);
        assert_eq!(chart.employees[1].name, "E2");
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        let bad = "[root]\nid = 1\nname = \"CEO\"\ntitle = \"boss\"\n";
        assert!(ChartFile::parse(bad).is_err());
    }

    #[test]
    fn test_export_after_move_reimports_same_shape() {
        let mut engine = ChartFile::parse(CHART)
            .unwrap()
            .into_engine(RedoPolicy::Discard)
            .unwrap();
        engine.move_employee(2, 3).unwrap();

        let exported = ChartFile::from_engine(&engine);
        assert_eq!(
            exported.employees[1],
            EmployeeRecord {
                id: 2,
                name: "E1".into(),
                supervisor: 3
            }
        );

        let text = exported.to_toml().unwrap();
        let again = ChartFile::parse(&text)
            .unwrap()
            .into_engine(RedoPolicy::Discard)
            .unwrap();
        assert_eq!(again.snapshot().unwrap(), engine.snapshot().unwrap());
    }
}
