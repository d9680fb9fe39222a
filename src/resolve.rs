//! Reference resolution: turn a node's declared arguments into concrete
//! values.
//!
//! A [`Resolver`] is scoped to one node. It materializes constructor
//! references (at most once per node), dereferences argument references and
//! bare key lookups, and records which memory key each node bound in the
//! variable map.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::trace;

use crate::error::ResolveError;
use crate::memory::Memory;
use crate::mother::{Arg, Call, Unpack, VarSpec};
use crate::value::{Args, Kwargs, Value};
use crate::widget::WidgetRef;

/// Node path to the memory key its last constructor reference bound.
pub type VariableMap = HashMap<String, String>;

pub struct Resolver<'a> {
    memory: &'a mut Memory,
    variables: &'a mut VariableMap,
    path: &'a str,
    root: &'a WidgetRef,
    /// Keys materialized within this node's scope.
    bound: HashSet<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        memory: &'a mut Memory,
        variables: &'a mut VariableMap,
        path: &'a str,
        root: &'a WidgetRef,
    ) -> Self {
        Self {
            memory,
            variables,
            path,
            root,
            bound: HashSet::new(),
        }
    }

    /// Resolve positional arguments.
    ///
    /// Arity-2 references add their pairs to `kwargs` without overwriting
    /// keys already there.
    pub fn resolve_args(&mut self, args: &[Arg], kwargs: &mut Kwargs) -> Result<Args, ResolveError> {
        let mut resolved = Args::with_capacity(args.len());
        for arg in args {
            match arg {
                Arg::Construct(spec) => resolved.push(self.construct(spec)?),
                Arg::Unpack(var) => {
                    let value = self.memory.value(&var.name)?;
                    match var.unpack {
                        Unpack::Single => resolved.push(value),
                        Unpack::Positional => resolved.extend(positional(&var.name, value)?),
                        Unpack::Keyword => {
                            for (key, item) in keyword_pairs(&var.name, value)? {
                                kwargs.entry(key).or_insert(item);
                            }
                        }
                    }
                }
                Arg::Literal(value) => resolved.push(self.literal(value)?),
            }
        }
        Ok(resolved)
    }

    /// Resolve keyword arguments. References are replaced wholesale; keywords
    /// never splice.
    pub fn resolve_kwargs(&mut self, kwargs: &IndexMap<String, Arg>) -> Result<Kwargs, ResolveError> {
        let mut resolved = Kwargs::with_capacity(kwargs.len());
        for (key, arg) in kwargs {
            let value = match arg {
                Arg::Construct(spec) => self.construct(spec)?,
                Arg::Unpack(var) => self.memory.value(&var.name)?,
                Arg::Literal(value) => self.literal(value)?,
            };
            resolved.insert(key.clone(), value);
        }
        Ok(resolved)
    }

    /// Resolve a whole argument list: positional first, then keywords, with
    /// literal keywords taking precedence over arity-2 defaults.
    pub fn resolve_parts(
        &mut self,
        args: &[Arg],
        kwargs: &IndexMap<String, Arg>,
    ) -> Result<(Args, Kwargs), ResolveError> {
        let mut defaults = Kwargs::new();
        let args = self.resolve_args(args, &mut defaults)?;
        let mut resolved = self.resolve_kwargs(kwargs)?;
        for (key, value) in defaults {
            resolved.entry(key).or_insert(value);
        }
        Ok((args, resolved))
    }

    /// Resolve a layout directive or post step.
    pub fn resolve_call(&mut self, call: &Call) -> Result<ResolvedCall, ResolveError> {
        let (args, kwargs) = self.resolve_parts(&call.args, &call.kwargs)?;
        Ok(ResolvedCall {
            method: call.method.clone(),
            args,
            kwargs,
        })
    }

    fn construct(&mut self, spec: &VarSpec) -> Result<Value, ResolveError> {
        self.variables
            .insert(self.path.to_owned(), spec.name.clone());
        if self.bound.contains(&spec.name) {
            return self.memory.value(&spec.name);
        }
        trace!(path = self.path, name = %spec.name, "binding constructor reference");
        let value = self.memory.materialize(
            &spec.name,
            self.root,
            spec.args.clone(),
            spec.kwargs.clone(),
        )?;
        self.bound.insert(spec.name.clone());
        Ok(value)
    }

    fn literal(&self, value: &Value) -> Result<Value, ResolveError> {
        match value.as_str() {
            Some(key) if self.memory.contains(key) => {
                trace!(path = self.path, key, "dereferencing memory key");
                self.memory.value(key)
            }
            _ => Ok(value.clone()),
        }
    }
}

/// A layout directive or post step with its arguments resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCall {
    pub method: String,
    pub args: Args,
    pub kwargs: Kwargs,
}

impl ResolvedCall {
    /// Invoke on `widget`.
    pub fn apply(&self, widget: &WidgetRef) -> Result<Value, crate::error::ToolkitError> {
        widget.call(&self.method, self.args.clone(), self.kwargs.clone())
    }
}

fn positional(name: &str, value: Value) -> Result<Vec<Value>, ResolveError> {
    match value {
        Value::List(items) => Ok(items),
        Value::Map(map) => Ok(map.into_keys().map(Value::Str).collect()),
        _ => Err(ResolveError::NotIterable(name.to_owned())),
    }
}

fn keyword_pairs(name: &str, value: Value) -> Result<Vec<(String, Value)>, ResolveError> {
    match value {
        Value::Map(map) => Ok(map.into_iter().collect()),
        Value::List(items) => items
            .into_iter()
            .map(|item| match item {
                Value::List(pair) => match <[Value; 2]>::try_from(pair) {
                    Ok([Value::Str(key), value]) => Ok((key, value)),
                    _ => Err(ResolveError::NotAMapping(name.to_owned())),
                },
                _ => Err(ResolveError::NotAMapping(name.to_owned())),
            })
            .collect(),
        _ => Err(ResolveError::NotAMapping(name.to_owned())),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
