//! Built-in ("system") variables and the per-request context they read from.

use std::fmt::Write;
use std::net::IpAddr;
use std::sync::OnceLock;

use crate::expression::trie::VariableTrie;

/// A built-in variable, available to every expression as `$name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemVariable {
    ContentLength,
    ContentType,
    CorrelationId,
    CallId,
    Host,
    RequestMethod,
    RequestScheme,
    RequestPathBase,
    RequestPath,
    RequestQueryString,
    RequestEncodedUri,
    RemoteAddress,
    RemotePort,
    ServerAddress,
    ServerName,
    ServerPort,
    ServerProtocol,
}

impl SystemVariable {
    pub const ALL: [SystemVariable; 17] = [
        SystemVariable::ContentLength,
        SystemVariable::ContentType,
        SystemVariable::CorrelationId,
        SystemVariable::CallId,
        SystemVariable::Host,
        SystemVariable::RequestMethod,
        SystemVariable::RequestScheme,
        SystemVariable::RequestPathBase,
        SystemVariable::RequestPath,
        SystemVariable::RequestQueryString,
        SystemVariable::RequestEncodedUri,
        SystemVariable::RemoteAddress,
        SystemVariable::RemotePort,
        SystemVariable::ServerAddress,
        SystemVariable::ServerName,
        SystemVariable::ServerPort,
        SystemVariable::ServerProtocol,
    ];

    /// The name used to reference this variable in expressions.
    pub fn name(self) -> &'static str {
        match self {
            SystemVariable::ContentLength => "content_length",
            SystemVariable::ContentType => "content_type",
            SystemVariable::CorrelationId => "correlation_id",
            SystemVariable::CallId => "call_id",
            SystemVariable::Host => "host",
            SystemVariable::RequestMethod => "request_method",
            SystemVariable::RequestScheme => "request_scheme",
            SystemVariable::RequestPathBase => "request_path_base",
            SystemVariable::RequestPath => "request_path",
            SystemVariable::RequestQueryString => "request_query_string",
            SystemVariable::RequestEncodedUri => "request_encoded_uri",
            SystemVariable::RemoteAddress => "remote_address",
            SystemVariable::RemotePort => "remote_port",
            SystemVariable::ServerAddress => "server_address",
            SystemVariable::ServerName => "server_name",
            SystemVariable::ServerPort => "server_port",
            SystemVariable::ServerProtocol => "server_protocol",
        }
    }

    /// Append this variable's value for `ctx` to `out`. Missing values append nothing.
    pub fn write_value(self, ctx: &dyn RequestContext, out: &mut String) {
        fn push(out: &mut String, value: Option<&str>) {
            if let Some(value) = value {
                out.push_str(value);
            }
        }

        fn push_display(out: &mut String, value: Option<impl std::fmt::Display>) {
            if let Some(value) = value {
                let _ = write!(out, "{}", value);
            }
        }

        match self {
            SystemVariable::ContentLength => push_display(out, ctx.content_length()),
            SystemVariable::ContentType => push(out, ctx.content_type()),
            SystemVariable::CorrelationId => push(out, ctx.correlation_id()),
            SystemVariable::CallId => push(out, ctx.call_id()),
            SystemVariable::Host => push(out, ctx.host()),
            SystemVariable::RequestMethod => push(out, ctx.request_method()),
            SystemVariable::RequestScheme => push(out, ctx.request_scheme()),
            SystemVariable::RequestPathBase => push(out, ctx.request_path_base()),
            SystemVariable::RequestPath => push(out, ctx.request_path()),
            SystemVariable::RequestQueryString => push(out, ctx.request_query_string()),
            SystemVariable::RequestEncodedUri => push(out, ctx.request_encoded_uri().as_deref()),
            SystemVariable::RemoteAddress => push_display(out, ctx.remote_address()),
            SystemVariable::RemotePort => push_display(out, ctx.remote_port()),
            SystemVariable::ServerAddress => push_display(out, ctx.server_address()),
            SystemVariable::ServerName => push(out, ctx.server_name()),
            SystemVariable::ServerPort => push_display(out, ctx.server_port()),
            SystemVariable::ServerProtocol => push(out, ctx.server_protocol()),
        }
    }
}

/// The process-wide trie of system variable names.
pub fn system_trie() -> &'static VariableTrie<SystemVariable> {
    static TRIE: OnceLock<VariableTrie<SystemVariable>> = OnceLock::new();
    TRIE.get_or_init(|| {
        let mut trie = VariableTrie::new();
        for variable in SystemVariable::ALL {
            let added = trie.add_value(variable.name(), variable);
            debug_assert!(added.is_ok(), "invalid system variable name {:?}", variable.name());
        }
        trie
    })
}

/// Returns true if `name` is exactly the name of a system variable.
pub fn is_system_variable(name: &str) -> bool {
    SystemVariable::ALL.iter().any(|v| v.name() == name)
}

/// Read access to the request and connection attributes behind system variables.
///
/// The gateway owns these values; expressions only read them. Every accessor
/// defaults to `None`, which evaluates to the empty string.
pub trait RequestContext {
    /// `Content-Length` of the inbound request.
    fn content_length(&self) -> Option<u64> {
        None
    }

    /// `Content-Type` of the inbound request.
    fn content_type(&self) -> Option<&str> {
        None
    }

    fn correlation_id(&self) -> Option<&str> {
        None
    }

    /// Identifier unique to this proxied call.
    fn call_id(&self) -> Option<&str> {
        None
    }

    /// Host to send upstream.
    fn host(&self) -> Option<&str> {
        None
    }

    fn request_method(&self) -> Option<&str> {
        None
    }

    fn request_scheme(&self) -> Option<&str> {
        None
    }

    /// Unescaped path base.
    fn request_path_base(&self) -> Option<&str> {
        None
    }

    /// Unescaped request path.
    fn request_path(&self) -> Option<&str> {
        None
    }

    /// Escaped query string including the leading `?`.
    fn request_query_string(&self) -> Option<&str> {
        None
    }

    /// scheme + `://` + host + path base + path + query string.
    fn request_encoded_uri(&self) -> Option<String> {
        let scheme = self.request_scheme()?;
        let host = self.host()?;
        Some(format!(
            "{}://{}{}{}{}",
            scheme,
            host,
            self.request_path_base().unwrap_or_default(),
            self.request_path().unwrap_or_default(),
            self.request_query_string().unwrap_or_default(),
        ))
    }

    fn remote_address(&self) -> Option<IpAddr> {
        None
    }

    fn remote_port(&self) -> Option<u16> {
        None
    }

    fn server_address(&self) -> Option<IpAddr> {
        None
    }

    fn server_name(&self) -> Option<&str> {
        None
    }

    fn server_port(&self) -> Option<u16> {
        None
    }

    /// Usually `HTTP/1.0`, `HTTP/1.1` or `HTTP/2`.
    fn server_protocol(&self) -> Option<&str> {
        None
    }
}

/// An owned snapshot of request attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub correlation_id: Option<String>,
    pub call_id: Option<String>,
    pub host: Option<String>,
    pub method: Option<String>,
    pub scheme: Option<String>,
    pub path_base: Option<String>,
    pub path: Option<String>,
    pub query_string: Option<String>,
    pub remote_address: Option<IpAddr>,
    pub remote_port: Option<u16>,
    pub server_address: Option<IpAddr>,
    pub server_name: Option<String>,
    pub server_port: Option<u16>,
    pub protocol: Option<String>,
}

impl RequestContext for RequestInfo {
    fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    fn call_id(&self) -> Option<&str> {
        self.call_id.as_deref()
    }

    fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    fn request_method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    fn request_scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    fn request_path_base(&self) -> Option<&str> {
        self.path_base.as_deref()
    }

    fn request_path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn request_query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    fn remote_address(&self) -> Option<IpAddr> {
        self.remote_address
    }

    fn remote_port(&self) -> Option<u16> {
        self.remote_port
    }

    fn server_address(&self) -> Option<IpAddr> {
        self.server_address
    }

    fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    fn server_port(&self) -> Option<u16> {
        self.server_port
    }

    fn server_protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }
}
