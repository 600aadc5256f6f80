//! The command catalog: a compile-time table mapping each service operation
//! to the HTTP request shape it produces.
//!
//! The catalog is data, not behavior — the client walks a [`Descriptor`] to
//! build a request and never hardcodes a path outside this module. Templates
//! here must stay bit-compatible with the service's published URI shapes.

use reqwest::Method;

/// Every operation the entity service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    GetEntity,
    CreateEntity,
    DeleteEntity,
    ExecuteQuery,
    ExecuteQueries,
    CreateModel,
    Version,
}

/// Where a bound parameter lands in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// Substituted into a `{placeholder}` in the URI template.
    Path,
    /// Appended to the query string.
    Query,
    /// Sent as the JSON request body (`Content-Type: application/json`).
    Body,
}

/// Which field of the parsed JSON response is surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseField {
    Data,
    Status,
}

impl ResponseField {
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Status => "status",
        }
    }
}

/// A single parameter binding in a command descriptor.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub location: ParamLocation,
    pub required: bool,
    /// A constant value baked into the catalog (e.g. `create=true`); callers
    /// never supply it.
    pub fixed: Option<&'static str>,
}

impl ParamSpec {
    const fn required(name: &'static str, location: ParamLocation) -> Self {
        Self {
            name,
            location,
            required: true,
            fixed: None,
        }
    }

    const fn fixed_query(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            location: ParamLocation::Query,
            required: true,
            fixed: Some(value),
        }
    }
}

/// The request shape for one command.
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub method: Method,
    pub path: &'static str,
    pub params: &'static [ParamSpec],
    pub response_field: ResponseField,
}

impl Command {
    pub const ALL: [Self; 7] = [
        Self::GetEntity,
        Self::CreateEntity,
        Self::DeleteEntity,
        Self::ExecuteQuery,
        Self::ExecuteQueries,
        Self::CreateModel,
        Self::Version,
    ];

    #[must_use]
    pub fn descriptor(self) -> Descriptor {
        match self {
            Self::GetEntity => Descriptor {
                method: Method::GET,
                path: "/entity/{name}/{id}",
                params: const {
                    &[
                        ParamSpec::required("name", ParamLocation::Path),
                        ParamSpec::required("id", ParamLocation::Path),
                    ]
                },
                response_field: ResponseField::Data,
            },
            Self::CreateEntity => Descriptor {
                method: Method::POST,
                path: "/entity/{name}",
                params: const {
                    &[
                        ParamSpec::required("name", ParamLocation::Path),
                        ParamSpec::required("data", ParamLocation::Body),
                    ]
                },
                response_field: ResponseField::Data,
            },
            Self::DeleteEntity => Descriptor {
                method: Method::DELETE,
                path: "/entity/{name}/{id}",
                params: const {
                    &[
                        ParamSpec::required("name", ParamLocation::Path),
                        ParamSpec::required("id", ParamLocation::Path),
                    ]
                },
                response_field: ResponseField::Status,
            },
            Self::ExecuteQuery => Descriptor {
                method: Method::GET,
                path: "/sql/query",
                params: const { &[ParamSpec::required("q", ParamLocation::Query)] },
                response_field: ResponseField::Data,
            },
            Self::ExecuteQueries => Descriptor {
                method: Method::GET,
                path: "/sql/queries",
                params: const { &[ParamSpec::required("queries", ParamLocation::Query)] },
                response_field: ResponseField::Data,
            },
            Self::CreateModel => Descriptor {
                method: Method::POST,
                path: "/model/{name}",
                params: const {
                    &[
                        ParamSpec::required("name", ParamLocation::Path),
                        ParamSpec::fixed_query("create", "true"),
                        ParamSpec::required("data", ParamLocation::Body),
                    ]
                },
                response_field: ResponseField::Data,
            },
            Self::Version => Descriptor {
                method: Method::GET,
                path: "/version",
                params: &[],
                response_field: ResponseField::Data,
            },
        }
    }
}

/// Schema-qualified entity path: `schema.entity` when a schema is given,
/// otherwise the bare entity name.
#[must_use]
pub fn entity_path(entity: &str, schema: Option<&str>) -> String {
    match schema {
        Some(schema) => format!("{schema}.{entity}"),
        None => entity.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, ParamLocation, ResponseField, entity_path};
    use reqwest::Method;

    #[test]
    fn entity_path_without_schema_is_bare_name() {
        assert_eq!(entity_path("widgets", None), "widgets");
    }

    #[test]
    fn entity_path_with_schema_is_dot_qualified() {
        assert_eq!(entity_path("widgets", Some("shop")), "shop.widgets");
    }

    #[test]
    fn catalog_covers_every_command_with_consistent_bindings() {
        for command in Command::ALL {
            let desc = command.descriptor();
            assert!(desc.path.starts_with('/'), "{command:?}: relative path");

            for param in desc.params {
                match param.location {
                    ParamLocation::Path => {
                        assert!(
                            desc.path.contains(&format!("{{{}}}", param.name)),
                            "{command:?}: no placeholder for path param '{}'",
                            param.name
                        );
                    }
                    ParamLocation::Query | ParamLocation::Body => {}
                }
            }
        }
    }

    #[test]
    fn delete_returns_status_everything_else_returns_data() {
        for command in Command::ALL {
            let expected = if command == Command::DeleteEntity {
                ResponseField::Status
            } else {
                ResponseField::Data
            };
            assert_eq!(command.descriptor().response_field, expected, "{command:?}");
        }
    }

    #[test]
    fn only_create_commands_carry_a_body() {
        for command in Command::ALL {
            let has_body = command
                .descriptor()
                .params
                .iter()
                .any(|p| p.location == ParamLocation::Body);
            let expected = matches!(command, Command::CreateEntity | Command::CreateModel);
            assert_eq!(has_body, expected, "{command:?}");
        }
    }

    #[test]
    fn model_creation_bakes_in_the_create_flag() {
        let desc = Command::CreateModel.descriptor();
        assert_eq!(desc.method, Method::POST);
        let create = desc
            .params
            .iter()
            .find(|p| p.name == "create")
            .expect("create param");
        assert_eq!(create.location, ParamLocation::Query);
        assert_eq!(create.fixed, Some("true"));
    }
}
