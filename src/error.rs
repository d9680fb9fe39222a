//! Error taxonomy for building and mutating a widget tree.
//!
//! [`FireError`] is what [`Fire`](crate::fire::Fire) returns. Its build-time
//! variants are non-overlapping (structural, parse, specification, render,
//! post, lookup) and each one carries the offending path plus the failure it
//! wraps as its `source`. The narrower enums below are the causes.

use std::fmt;

/// Result alias defaulting to [`FireError`].
pub type Result<T, E = FireError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// ToolkitError
// ---------------------------------------------------------------------------

/// A failure reported by the host toolkit: a constructor, a widget method, an
/// option access or a callback.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolkitError {
    #[error("unknown option \"{option}\" for {class}")]
    UnknownOption { class: String, option: String },
    #[error("{class} has no method \"{method}\"")]
    UnknownMethod { class: String, method: String },
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0} is not callable")]
    NotCallable(String),
    #[error("constructor produced {0}, not a widget")]
    NotAWidget(String),
    /// The widget is already mutably borrowed further up the call stack.
    #[error("widget is busy (re-entrant access)")]
    Busy,
    #[error("{0}")]
    Custom(String),
}

impl ToolkitError {
    /// Shorthand for [`ToolkitError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        ToolkitError::InvalidArgument(message.into())
    }
}

// ---------------------------------------------------------------------------
// ResolveError
// ---------------------------------------------------------------------------

/// Failure while resolving reference markers against memory.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("no entry named '{0}' in memory")]
    MissingKey(String),
    #[error("memory entry '{0}' holds a value, not a factory")]
    NotAFactory(String),
    #[error("memory entry '{0}' has not been constructed yet")]
    Unmaterialized(String),
    #[error("memory entry '{0}' cannot be unpacked into positional arguments")]
    NotIterable(String),
    #[error("memory entry '{0}' cannot be unpacked into keyword arguments")]
    NotAMapping(String),
    #[error("unpack arity must be 0, 1, or 2, not {0}")]
    InvalidArity(u8),
    #[error("factory for '{name}' failed")]
    Factory {
        name: String,
        #[source]
        source: ToolkitError,
    },
}

// ---------------------------------------------------------------------------
// DispatchError
// ---------------------------------------------------------------------------

/// Failure while turning a constructor reference into a widget.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("no constructor named '{0}' in any namespace or the custom registry")]
    NotFound(String),
    #[error("a stub cannot be constructed directly")]
    Deferred,
    #[error(transparent)]
    Toolkit(#[from] ToolkitError),
}

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

/// Failure while addressing the registry by path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("no widget registered at '{0}'")]
    Missing(String),
    #[error("'{0}' is a pending stub, not a built widget")]
    Pending(String),
}

// ---------------------------------------------------------------------------
// FireError
// ---------------------------------------------------------------------------

/// What a render error was doing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderAction {
    Build,
    Place,
    Scroll,
}

impl fmt::Display for RenderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderAction::Build => "build",
            RenderAction::Place => "place",
            RenderAction::Scroll => "attach scrollbars to",
        })
    }
}

/// Errors raised while building a tree or using the post-build API.
#[derive(Debug, thiserror::Error)]
pub enum FireError {
    /// The parent of a node could not be established.
    #[error("failed to create path for '{parent}'")]
    Structural {
        parent: String,
        #[source]
        source: RegistryError,
    },
    /// A node is missing its type or has an illegal name.
    #[error("could not parse '{path}' ({reason}) from:\n{snapshot}")]
    Parse {
        path: String,
        reason: String,
        snapshot: String,
    },
    /// A reference marker in a node's arguments could not be resolved.
    #[error("could not resolve {part} arguments for '{path}' from:\n{snapshot}")]
    Specification {
        path: String,
        part: String,
        snapshot: String,
        #[source]
        source: ResolveError,
    },
    /// Construction, placement or scrollbar wiring failed.
    #[error("could not {action} '{path}' from:\n{snapshot}")]
    Render {
        path: String,
        action: RenderAction,
        snapshot: String,
        #[source]
        source: ToolkitError,
    },
    /// A post-construction call failed.
    #[error("could not execute post method '{method}' specified in '{path}'")]
    Post {
        path: String,
        method: String,
        #[source]
        source: ToolkitError,
    },
    /// A symbolic constructor name did not resolve.
    #[error("could not find a constructor for '{path}': {source}")]
    Lookup {
        path: String,
        #[source]
        source: DispatchError,
    },
    /// `build` already ran on this builder.
    #[error("the tree has already been built")]
    AlreadyBuilt,
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("'{0}' is not a pending stub")]
    NotPending(String),
    #[error("no variable is bound to '{0}'")]
    Unbound(String),
    #[error(transparent)]
    Toolkit(#[from] ToolkitError),
}

impl FireError {
    /// The node path this error is about, when it has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            FireError::Structural { parent, .. } => Some(parent),
            FireError::Parse { path, .. }
            | FireError::Specification { path, .. }
            | FireError::Render { path, .. }
            | FireError::Post { path, .. }
            | FireError::Lookup { path, .. } => Some(path),
            FireError::Registry(RegistryError::Missing(path))
            | FireError::Registry(RegistryError::Pending(path))
            | FireError::NotPending(path)
            | FireError::Unbound(path) => Some(path),
            FireError::AlreadyBuilt | FireError::Toolkit(_) => None,
        }
    }
}
