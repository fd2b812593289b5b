// file: src/mcp/server.rs
// description: MCP server exposing repository, module and path lookups to tool callers
// reference: https://docs.rs/rmcp

use crate::config::ServerConfig;
use crate::models::ModuleInfo;
use crate::workspace::Workspace;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RepositoryFilter {
    /// Repository id; omit for every repository (or the default, where noted)
    pub repo_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ModuleQuery {
    /// Module id or name; exact matches win over partial matches
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PathQuery {
    /// Repository-qualified address, e.g. /my-repo/src/index.ts
    pub path: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    pub id: String,
    pub display_name: String,
    pub root_path: PathBuf,
    pub is_default: bool,
    pub module_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAddress {
    pub address: String,
    pub repo_id: String,
    pub absolute_path: PathBuf,
    pub module: Option<String>,
}

pub fn repository_summaries(workspace: &Workspace) -> Vec<RepositorySummary> {
    let default_id = workspace.repositories().default_id();
    workspace
        .repositories()
        .repositories()
        .map(|repo| RepositorySummary {
            id: repo.id.clone(),
            display_name: repo.display_name.clone(),
            root_path: repo.root_path.clone(),
            is_default: default_id == Some(repo.id.as_str()),
            module_count: workspace.modules().get_by_repo(&repo.id).len(),
        })
        .collect()
}

/// Validates then resolves; the error string is the validation guidance.
pub fn resolve_address(workspace: &Workspace, address: &str) -> Result<ResolvedAddress, String> {
    let validation = workspace.validate(address);
    let Some(reference) = validation.reference.filter(|_| validation.is_valid) else {
        return Err(validation
            .error_message
            .unwrap_or_else(|| format!("Invalid path '{}'", address)));
    };

    let absolute_path = workspace
        .resolver()
        .resolve_reference(&reference)
        .map_err(|e| e.to_string())?;
    let repo_id = workspace
        .repositories()
        .get(reference.repo_id())
        .map(|repo| repo.id.clone())
        .unwrap_or_default();
    let module = workspace
        .modules()
        .module_for_path(&repo_id, reference.relative_path())
        .map(|m| m.id.clone());

    Ok(ResolvedAddress {
        address: address.to_string(),
        repo_id,
        absolute_path,
        module,
    })
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization failed: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[derive(Clone)]
pub struct NavigatorMcp {
    workspace: Arc<RwLock<Workspace>>,
    server: ServerConfig,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl NavigatorMcp {
    /// Takes a fully initialized workspace; tools are only served after detection finished.
    pub fn new(workspace: Workspace, server: ServerConfig) -> Self {
        Self {
            workspace: Arc::new(RwLock::new(workspace)),
            server,
            tool_router: Self::tool_router(),
        }
    }

    pub fn get_tool_router(&self) -> &ToolRouter<Self> {
        &self.tool_router
    }

    #[tool(description = "List registered repositories with their ids, root paths and module counts. Use the ids as the first segment of every path: /<repo_id>/<relative path>.")]
    async fn list_repositories(&self) -> Result<CallToolResult, McpError> {
        info!("MCP: Listing repositories");
        let workspace = self.workspace.read().await;
        json_result(&repository_summaries(&workspace))
    }

    #[tool(description = "List detected modules (type and primary language) of one repository, or of all repositories when repo_id is omitted.")]
    async fn list_modules(
        &self,
        Parameters(filter): Parameters<RepositoryFilter>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP: Listing modules (repo: {:?})", filter.repo_id);
        let workspace = self.workspace.read().await;

        let modules: Vec<ModuleInfo> = match filter.repo_id.as_deref() {
            Some(repo_id) => {
                let repo = workspace
                    .repositories()
                    .require(repo_id)
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                workspace.modules().get_by_repo(&repo.id)
            }
            None => workspace.modules().all().cloned().collect(),
        };
        json_result(&modules)
    }

    #[tool(description = "Find a module by id or name across all repositories. Exact id matches take precedence over name matches, which take precedence over partial matches.")]
    async fn find_module(
        &self,
        Parameters(query): Parameters<ModuleQuery>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP: Finding module {}", query.name);
        let workspace = self.workspace.read().await;

        match workspace.modules().get_by_name(&query.name) {
            Some(module) => json_result(module),
            None => Ok(CallToolResult::error(vec![Content::text(format!(
                "No module matching '{}'",
                query.name
            ))])),
        }
    }

    #[tool(description = "Check whether a path is a valid absolute repository path (/<repo_id>/<relative path>). Returns isValid and, when invalid, an errorMessage with a corrected example.")]
    async fn validate_path(
        &self,
        Parameters(query): Parameters<PathQuery>,
    ) -> Result<CallToolResult, McpError> {
        let workspace = self.workspace.read().await;
        json_result(&workspace.validate(&query.path))
    }

    #[tool(description = "Resolve an absolute repository path (/<repo_id>/<relative path>) to its location on disk and the module that contains it.")]
    async fn resolve_path(
        &self,
        Parameters(query): Parameters<PathQuery>,
    ) -> Result<CallToolResult, McpError> {
        let workspace = self.workspace.read().await;

        match resolve_address(&workspace, &query.path) {
            Ok(resolved) => json_result(&resolved),
            Err(message) => {
                warn!("MCP: Rejected path {}: {}", query.path, message);
                Ok(CallToolResult::error(vec![Content::text(message)]))
            }
        }
    }

    #[tool(description = "Re-run module detection for one repository, or for every repository when repo_id is omitted, replacing the previously detected modules.")]
    async fn rescan_modules(
        &self,
        Parameters(filter): Parameters<RepositoryFilter>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP: Rescanning modules (repo: {:?})", filter.repo_id);
        let mut workspace = self.workspace.write().await;

        let modules = match filter.repo_id.as_deref() {
            Some(repo_id) => workspace
                .rescan(repo_id)
                .await
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?,
            None => {
                workspace.detect_all().await;
                workspace.modules().all().cloned().collect()
            }
        };
        json_result(&modules)
    }
}

#[tool_handler]
impl ServerHandler for NavigatorMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.server.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: self.server.instructions.clone(),
            ..Default::default()
        }
    }
}
