//! Typed shell commands and their argument schemas

use super::parser::{parse_raw, RawCommand};
use super::{ShellError, ShellResult};
use crate::graph::{EdgeType, IdSet, NodeId, NodeKind, PropertyMap, PropertyValue, RefId};
use std::path::PathBuf;

/// One executable shell command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddEntity {
        id: NodeId,
        attributes: Option<PropertyMap>,
        patterns: Option<IdSet>,
    },
    AddPattern {
        id: NodeId,
        qkit: Option<IdSet>,
        parents: Option<IdSet>,
        children: Option<IdSet>,
    },
    AddIQuery {
        id: NodeId,
        ref_id: RefId,
        prompts: IdSet,
    },
    AddAttribute {
        id: NodeId,
        ref_id: RefId,
        attributes: Option<PropertyMap>,
        patterns: Option<IdSet>,
    },
    AddPromptInterface {
        id: NodeId,
        /// Registry name; absent leaves the interface unbound
        function: Option<String>,
    },
    AddRelationship {
        source: NodeId,
        target: NodeId,
        relationship_type: EdgeType,
    },
    Nodes {
        kind: NodeKind,
    },
    Show {
        id: NodeId,
    },
    Relationships {
        id: NodeId,
        relationship_type: Option<EdgeType>,
    },
    Edge {
        source: NodeId,
        target: NodeId,
        relationship_type: Option<EdgeType>,
    },
    Path {
        source: NodeId,
        target: NodeId,
        relationship_type: Option<EdgeType>,
    },
    Check,
    Save {
        path: PathBuf,
    },
    Load {
        path: PathBuf,
    },
    Help,
    Exit,
}

/// Name, parameters (required first) and one-line description of a command
pub struct CommandSpec {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub required: usize,
    pub summary: &'static str,
}

impl CommandSpec {
    pub fn usage(&self) -> String {
        let mut usage = self.name.to_string();
        for (i, param) in self.params.iter().enumerate() {
            if i < self.required {
                usage.push_str(&format!(" <{}>", param));
            } else {
                usage.push_str(&format!(" [{}]", param));
            }
        }
        usage
    }
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "add_entity",
        params: &["id", "attributes", "patterns"],
        required: 1,
        summary: "Add or replace an entity",
    },
    CommandSpec {
        name: "add_pattern",
        params: &["id", "qkit", "parents", "children"],
        required: 1,
        summary: "Add or replace a pattern",
    },
    CommandSpec {
        name: "add_iquery",
        params: &["id", "ref_id", "prompts"],
        required: 2,
        summary: "Add or replace an iQuery",
    },
    CommandSpec {
        name: "add_attribute",
        params: &["id", "ref_id", "attributes", "patterns"],
        required: 2,
        summary: "Add or replace an attribute",
    },
    CommandSpec {
        name: "add_prompt_interface",
        params: &["id", "function"],
        required: 1,
        summary: "Add or replace a prompt interface bound to a named function",
    },
    CommandSpec {
        name: "add_relationship",
        params: &["source", "target", "relationship_type"],
        required: 3,
        summary: "Add a typed edge between two existing nodes",
    },
    CommandSpec {
        name: "nodes",
        params: &["kind"],
        required: 1,
        summary: "List node ids of one kind",
    },
    CommandSpec {
        name: "show",
        params: &["id"],
        required: 1,
        summary: "Show every field of a node",
    },
    CommandSpec {
        name: "relationships",
        params: &["id", "relationship_type"],
        required: 1,
        summary: "List outgoing edges of a node",
    },
    CommandSpec {
        name: "edge",
        params: &["source", "target", "relationship_type"],
        required: 2,
        summary: "Show the attributes of one edge",
    },
    CommandSpec {
        name: "path",
        params: &["source", "target", "relationship_type"],
        required: 2,
        summary: "Shortest directed path between two nodes",
    },
    CommandSpec {
        name: "check",
        params: &[],
        required: 0,
        summary: "Report cross-reference problems",
    },
    CommandSpec {
        name: "save",
        params: &["path"],
        required: 1,
        summary: "Save the graph to a file",
    },
    CommandSpec {
        name: "load",
        params: &["path"],
        required: 1,
        summary: "Replace the graph with one loaded from a file",
    },
    CommandSpec {
        name: "help",
        params: &[],
        required: 0,
        summary: "List commands",
    },
    CommandSpec {
        name: "exit",
        params: &[],
        required: 0,
        summary: "Leave the shell (also: quit)",
    },
];

pub fn command_spec(name: &str) -> Option<&'static CommandSpec> {
    let name = if name == "quit" { "exit" } else { name };
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// Arguments matched against a command's parameter list
struct BoundArgs {
    command: &'static str,
    params: &'static [&'static str],
    values: Vec<Option<PropertyValue>>,
}

impl BoundArgs {
    fn bind(spec: &'static CommandSpec, raw: RawCommand) -> ShellResult<Self> {
        let found = raw.positional.len() + raw.keyword.len();
        let arity = || ShellError::Arity {
            command: spec.name,
            expected: expected_range(spec),
            found,
        };

        if raw.positional.len() > spec.params.len() {
            return Err(arity());
        }

        let mut values: Vec<Option<PropertyValue>> = vec![None; spec.params.len()];
        for (slot, value) in values.iter_mut().zip(raw.positional) {
            *slot = Some(value);
        }

        for (key, value) in raw.keyword {
            let index = spec
                .params
                .iter()
                .position(|param| *param == key)
                .ok_or_else(|| ShellError::UnknownArgument {
                    command: spec.name,
                    argument: key.clone(),
                })?;
            if values[index].is_some() {
                return Err(ShellError::DuplicateArgument {
                    command: spec.name,
                    argument: key,
                });
            }
            values[index] = Some(value);
        }

        if values[..spec.required].iter().any(Option::is_none) {
            return Err(arity());
        }

        Ok(BoundArgs {
            command: spec.name,
            params: spec.params,
            values,
        })
    }

    fn take(&mut self, index: usize) -> Option<PropertyValue> {
        self.values.get_mut(index).and_then(Option::take)
    }

    fn type_error(&self, index: usize, expected: &'static str, found: &PropertyValue) -> ShellError {
        ShellError::ArgumentType {
            command: self.command,
            argument: self.params[index],
            expected,
            found: found.type_name(),
        }
    }

    fn opt_string(&mut self, index: usize) -> ShellResult<Option<String>> {
        match self.take(index) {
            None | Some(PropertyValue::Null) => Ok(None),
            Some(PropertyValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.type_error(index, "string", &other)),
        }
    }

    fn string(&mut self, index: usize) -> ShellResult<String> {
        match self.take(index) {
            Some(PropertyValue::String(s)) => Ok(s),
            Some(other) => Err(self.type_error(index, "string", &other)),
            None => Err(ShellError::Arity {
                command: self.command,
                expected: self.params.len().to_string(),
                found: self.values.iter().filter(|v| v.is_some()).count(),
            }),
        }
    }

    /// Like [`BoundArgs::string`], but unquoted numbers are taken as their text
    fn text(&mut self, index: usize) -> ShellResult<String> {
        match self.take(index) {
            Some(PropertyValue::Integer(i)) => Ok(i.to_string()),
            Some(PropertyValue::Float(f)) => Ok(f.to_string()),
            Some(other) => {
                self.values[index] = Some(other);
                self.string(index)
            }
            None => self.string(index),
        }
    }

    fn id(&mut self, index: usize) -> ShellResult<NodeId> {
        self.text(index).map(NodeId::from)
    }

    fn opt_map(&mut self, index: usize) -> ShellResult<Option<PropertyMap>> {
        match self.take(index) {
            None | Some(PropertyValue::Null) => Ok(None),
            Some(PropertyValue::Map(map)) => Ok(Some(map)),
            Some(other) => Err(self.type_error(index, "map", &other)),
        }
    }

    fn opt_ids(&mut self, index: usize) -> ShellResult<Option<IdSet>> {
        match self.take(index) {
            None | Some(PropertyValue::Null) => Ok(None),
            Some(PropertyValue::Array(items)) => {
                let mut ids = IdSet::with_capacity(items.len());
                for item in items {
                    match item {
                        PropertyValue::String(s) => {
                            ids.insert(NodeId::from(s));
                        }
                        other => return Err(self.type_error(index, "list of ids", &other)),
                    }
                }
                Ok(Some(ids))
            }
            Some(other) => Err(self.type_error(index, "list of ids", &other)),
        }
    }

    fn ids(&mut self, index: usize) -> ShellResult<IdSet> {
        Ok(self.opt_ids(index)?.unwrap_or_default())
    }
}

fn expected_range(spec: &CommandSpec) -> String {
    if spec.required == spec.params.len() {
        spec.required.to_string()
    } else {
        format!("{} to {}", spec.required, spec.params.len())
    }
}

impl Command {
    /// Parse and schema-check one input line
    pub fn parse(input: &str) -> ShellResult<Self> {
        Self::from_raw(parse_raw(input)?)
    }

    pub fn from_raw(raw: RawCommand) -> ShellResult<Self> {
        let spec = command_spec(&raw.name).ok_or_else(|| ShellError::UnknownCommand(raw.name.clone()))?;
        let mut args = BoundArgs::bind(spec, raw)?;

        let command = match spec.name {
            "add_entity" => Command::AddEntity {
                id: args.id(0)?,
                attributes: args.opt_map(1)?,
                patterns: args.opt_ids(2)?,
            },
            "add_pattern" => Command::AddPattern {
                id: args.id(0)?,
                qkit: args.opt_ids(1)?,
                parents: args.opt_ids(2)?,
                children: args.opt_ids(3)?,
            },
            "add_iquery" => Command::AddIQuery {
                id: args.id(0)?,
                ref_id: RefId::from(args.text(1)?),
                prompts: args.ids(2)?,
            },
            "add_attribute" => Command::AddAttribute {
                id: args.id(0)?,
                ref_id: RefId::from(args.text(1)?),
                attributes: args.opt_map(2)?,
                patterns: args.opt_ids(3)?,
            },
            "add_prompt_interface" => Command::AddPromptInterface {
                id: args.id(0)?,
                function: args.opt_string(1)?,
            },
            "add_relationship" => Command::AddRelationship {
                source: args.id(0)?,
                target: args.id(1)?,
                relationship_type: EdgeType::from(args.string(2)?),
            },
            "nodes" => {
                let kind = args.string(0)?;
                Command::Nodes {
                    kind: kind.parse().map_err(|_| ShellError::ArgumentType {
                        command: spec.name,
                        argument: "kind",
                        expected: "entity, pattern, iquery, attribute or prompt_interface",
                        found: "String",
                    })?,
                }
            }
            "show" => Command::Show { id: args.id(0)? },
            "relationships" => Command::Relationships {
                id: args.id(0)?,
                relationship_type: args.opt_string(1)?.map(EdgeType::from),
            },
            "edge" => Command::Edge {
                source: args.id(0)?,
                target: args.id(1)?,
                relationship_type: args.opt_string(2)?.map(EdgeType::from),
            },
            "path" => Command::Path {
                source: args.id(0)?,
                target: args.id(1)?,
                relationship_type: args.opt_string(2)?.map(EdgeType::from),
            },
            "check" => Command::Check,
            "save" => Command::Save {
                path: PathBuf::from(args.string(0)?),
            },
            "load" => Command::Load {
                path: PathBuf::from(args.string(0)?),
            },
            "help" => Command::Help,
            "exit" => Command::Exit,
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        };

        Ok(command)
    }
}

/// Usage lines for every command
pub fn help_text() -> String {
    let usages: Vec<String> = COMMANDS.iter().map(CommandSpec::usage).collect();
    let width = usages.iter().map(String::len).max().unwrap_or(0);

    let mut text = String::from("Commands:\n");
    for (usage, spec) in usages.iter().zip(COMMANDS) {
        text.push_str(&format!("  {:width$}  {}\n", usage, spec.summary, width = width));
    }
    text.push_str("\nArguments are literals: words, 'strings', numbers, true/false, null, [lists], {maps}.\n");
    text.push_str("Call syntax also works: add_entity('CoffeeBean', attributes={'type': 'Arabica'})\n");
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{id_set, property_map};

    #[test]
    fn test_add_entity_positional_and_keyword() {
        let positional = Command::parse("add_entity CoffeeBean {type: Arabica} [BeanPattern]").unwrap();
        let keyword = Command::parse(
            "add_entity('CoffeeBean', attributes={'type': 'Arabica'}, patterns=['BeanPattern'])",
        )
        .unwrap();

        let expected = Command::AddEntity {
            id: NodeId::new("CoffeeBean"),
            attributes: Some(property_map([("type", "Arabica")])),
            patterns: Some(id_set(["BeanPattern"])),
        };
        assert_eq!(positional, expected);
        assert_eq!(keyword, expected);
    }

    #[test]
    fn test_optional_trailing_arguments() {
        assert_eq!(
            Command::parse("add_pattern ShopPattern").unwrap(),
            Command::AddPattern {
                id: NodeId::new("ShopPattern"),
                qkit: None,
                parents: None,
                children: None,
            }
        );
        assert_eq!(
            Command::parse("relationships Roaster").unwrap(),
            Command::Relationships { id: NodeId::new("Roaster"), relationship_type: None }
        );
    }

    #[test]
    fn test_keyword_skips_optional_positions() {
        let command = Command::parse("add_pattern(RoasterPattern, children=[ShopPattern])").unwrap();
        assert_eq!(
            command,
            Command::AddPattern {
                id: NodeId::new("RoasterPattern"),
                qkit: None,
                parents: None,
                children: Some(id_set(["ShopPattern"])),
            }
        );
    }

    #[test]
    fn test_iquery_prompts_default_empty() {
        assert_eq!(
            Command::parse("add_iquery BeanQuery BID1").unwrap(),
            Command::AddIQuery {
                id: NodeId::new("BeanQuery"),
                ref_id: RefId::new("BID1"),
                prompts: IdSet::new(),
            }
        );
        let err = Command::parse("add_iquery BeanQuery").unwrap_err();
        assert!(matches!(err, ShellError::Arity { command: "add_iquery", found: 1, .. }));
    }

    #[test]
    fn test_too_many_arguments() {
        let err = Command::parse("show A B").unwrap_err();
        assert!(matches!(err, ShellError::Arity { command: "show", .. }));
    }

    #[test]
    fn test_argument_type_checked() {
        let err = Command::parse("add_entity X [not, a, map]").unwrap_err();
        assert!(matches!(
            err,
            ShellError::ArgumentType {
                command: "add_entity",
                argument: "attributes",
                expected: "map",
                found: "Array",
            }
        ));

        let err = Command::parse("add_entity X {} [1, 2]").unwrap_err();
        assert!(matches!(err, ShellError::ArgumentType { argument: "patterns", .. }));

        let err = Command::parse("add_entity X {} [true]").unwrap_err();
        assert!(matches!(err, ShellError::ArgumentType { argument: "patterns", found: "Boolean", .. }));
    }

    #[test]
    fn test_unquoted_numbers_as_ids() {
        assert_eq!(Command::parse("show 42").unwrap(), Command::Show { id: NodeId::new("42") });
        assert_eq!(
            Command::parse("add_iquery Q 7 []").unwrap(),
            Command::AddIQuery {
                id: NodeId::new("Q"),
                ref_id: RefId::new("7"),
                prompts: IdSet::new(),
            }
        );
        assert!(matches!(
            Command::parse("show [42]"),
            Err(ShellError::ArgumentType { argument: "id", found: "Array", .. })
        ));
    }

    #[test]
    fn test_unknown_and_duplicate_arguments() {
        assert!(matches!(
            Command::parse("add_entity(X, colour=red)"),
            Err(ShellError::UnknownArgument { .. })
        ));
        assert!(matches!(
            Command::parse("add_entity(X, id=Y)"),
            Err(ShellError::DuplicateArgument { .. })
        ));
    }

    #[test]
    fn test_unknown_command() {
        match Command::parse("drop_everything") {
            Err(ShellError::UnknownCommand(name)) => assert_eq!(name, "drop_everything"),
            other => panic!("expected UnknownCommand, got {:?}", other),
        }
    }

    #[test]
    fn test_nodes_kind() {
        assert_eq!(
            Command::parse("nodes prompt_interface").unwrap(),
            Command::Nodes { kind: NodeKind::PromptInterface }
        );
        assert!(matches!(
            Command::parse("nodes widgets"),
            Err(ShellError::ArgumentType { argument: "kind", .. })
        ));
    }

    #[test]
    fn test_quit_alias() {
        assert_eq!(Command::parse("quit").unwrap(), Command::Exit);
        assert_eq!(Command::parse("exit").unwrap(), Command::Exit);
    }

    #[test]
    fn test_prompt_interface_function_optional() {
        assert_eq!(
            Command::parse("add_prompt_interface BeanPrompt").unwrap(),
            Command::AddPromptInterface { id: NodeId::new("BeanPrompt"), function: None }
        );
        assert_eq!(
            Command::parse("add_prompt_interface BeanPrompt identity").unwrap(),
            Command::AddPromptInterface {
                id: NodeId::new("BeanPrompt"),
                function: Some("identity".to_string()),
            }
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = help_text();
        for spec in COMMANDS {
            assert!(help.contains(spec.name), "missing {}", spec.name);
        }
        assert!(help.contains("add_iquery <id> <ref_id> [prompts]"));
    }
}
