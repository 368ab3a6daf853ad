//! Interactive session state
//!
//! A session owns one graph and the configuration used to save it. Lines are
//! parsed into [`Command`]s and executed against the graph; nothing typed at
//! the prompt is ever evaluated as code.

use super::command::{help_text, Command};
use super::output::{CommandOutput, EdgeRecord};
use super::ShellResult;
use crate::config::AtlasConfig;
use crate::graph::{FunctionHandle, GraphStore, NodeId, NodeKind, TracingSink};
use crate::persistence;
use crate::query;
use tracing::debug;

pub struct Session {
    store: GraphStore,
    config: AtlasConfig,
}

impl Session {
    /// Empty graph whose mutations are logged through `tracing`
    pub fn new(config: AtlasConfig) -> Self {
        Self::with_store(GraphStore::new(), config)
    }

    pub fn with_store(mut store: GraphStore, config: AtlasConfig) -> Self {
        store.add_sink(TracingSink);
        Session { store, config }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn into_store(self) -> GraphStore {
        self.store
    }

    /// Parse and run one line. Blank lines and `#` comments yield `None`.
    pub fn execute_line(&mut self, line: &str) -> ShellResult<Option<CommandOutput>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let command = Command::parse(line)?;
        debug!("Executing {:?}", command);
        self.execute(command).map(Some)
    }

    pub fn execute(&mut self, command: Command) -> ShellResult<CommandOutput> {
        let output = match command {
            Command::AddEntity { id, attributes, patterns } => {
                let replaced = self.previous_kind(&id);
                self.store.add_entity(id.clone(), attributes, patterns)?;
                self.node_added(id, NodeKind::Entity, replaced)
            }
            Command::AddPattern { id, qkit, parents, children } => {
                let replaced = self.previous_kind(&id);
                self.store.add_pattern(id.clone(), qkit, parents, children)?;
                self.node_added(id, NodeKind::Pattern, replaced)
            }
            Command::AddIQuery { id, ref_id, prompts } => {
                let replaced = self.previous_kind(&id);
                self.store.add_iquery(id.clone(), ref_id, prompts)?;
                self.node_added(id, NodeKind::IQuery, replaced)
            }
            Command::AddAttribute { id, ref_id, attributes, patterns } => {
                let replaced = self.previous_kind(&id);
                self.store.add_attribute(id.clone(), ref_id, attributes, patterns)?;
                self.node_added(id, NodeKind::Attribute, replaced)
            }
            Command::AddPromptInterface { id, function } => {
                let replaced = self.previous_kind(&id);
                let handle = function.map_or(FunctionHandle::Unbound, FunctionHandle::Registered);
                self.store.add_prompt_interface(id.clone(), handle)?;
                self.node_added(id, NodeKind::PromptInterface, replaced)
            }
            Command::AddRelationship { source, target, relationship_type } => {
                let replaced = self.store.get_edge(&source, &target, &relationship_type).is_some();
                self.store
                    .add_relationship(source.clone(), target.clone(), relationship_type.clone())?;
                CommandOutput::RelationshipAdded {
                    source,
                    target,
                    relationship_type,
                    replaced,
                }
            }
            Command::Nodes { kind } => CommandOutput::NodeIds {
                kind,
                ids: self.store.get_nodes_by_type(kind),
            },
            Command::Show { id } => {
                let fields = self.store.get_node_attributes(&id)?;
                CommandOutput::Node { id, fields }
            }
            Command::Relationships { id, relationship_type } => {
                let edges = self
                    .store
                    .get_relationships(&id, relationship_type.as_ref())?
                    .into_iter()
                    .map(EdgeRecord::from)
                    .collect();
                CommandOutput::Relationships { id, edges }
            }
            Command::Edge { source, target, relationship_type } => {
                let attributes =
                    query::get_edge_attributes(&self.store, &source, &target, relationship_type.as_ref())?;
                CommandOutput::EdgeAttributes { source, target, attributes }
            }
            Command::Path { source, target, relationship_type } => {
                let nodes = match relationship_type {
                    Some(t) => query::find_shortest_path_via(&self.store, &source, &target, &t)?,
                    None => query::find_shortest_path(&self.store, &source, &target)?,
                };
                CommandOutput::Path { nodes }
            }
            Command::Check => CommandOutput::Violations {
                violations: self.store.check_invariants(),
            },
            Command::Save { path } => {
                persistence::save_graph(&self.store, &path, &self.config.persistence)?;
                CommandOutput::Saved {
                    path,
                    nodes: self.store.node_count(),
                    edges: self.store.edge_count(),
                }
            }
            Command::Load { path } => {
                let mut store = persistence::load_graph(&path)?;
                store.add_sink(TracingSink);
                self.store = store;
                CommandOutput::Loaded {
                    path,
                    nodes: self.store.node_count(),
                    edges: self.store.edge_count(),
                }
            }
            Command::Help => CommandOutput::Help { text: help_text() },
            Command::Exit => CommandOutput::Exit,
        };

        Ok(output)
    }

    fn previous_kind(&self, id: &NodeId) -> Option<NodeKind> {
        self.store.get_node(id).map(|node| node.kind())
    }

    fn node_added(&self, id: NodeId, kind: NodeKind, replaced: Option<NodeKind>) -> CommandOutput {
        CommandOutput::NodeAdded { id, kind, replaced }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AtlasConfig::default())
    }
}
