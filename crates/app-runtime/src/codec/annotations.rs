//! Startup check of service annotations.
//!
//! Violations are reported as warnings and never stop composition.

use std::fmt;

use app_types::codec::InterfaceRegistry;
use app_types::module::{ServiceDescriptor, ServiceKind};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Msg service without the msg-service annotation.
    MissingMsgServiceAnnotation,
    /// Msg method whose request is not a registered signable message.
    UnsignableRequest,
    /// Method without a response type.
    MissingResponseType,
}

/// One annotation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationViolation {
    pub module: String,
    pub service: String,
    pub method: Option<String>,
    pub kind: ViolationKind,
}

impl fmt::Display for AnnotationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let problem = match self.kind {
            ViolationKind::MissingMsgServiceAnnotation => {
                "msg service is missing the msg-service annotation"
            }
            ViolationKind::UnsignableRequest => "request type is not a registered signable message",
            ViolationKind::MissingResponseType => "method does not declare a response type",
        };
        match &self.method {
            Some(method) => write!(f, "{}: {}/{}: {}", self.module, self.service, method, problem),
            None => write!(f, "{}: {}: {}", self.module, self.service, problem),
        }
    }
}

/// Check every descriptor and log each violation as a warning.
pub fn validate_service_annotations(
    descriptors: &[(String, ServiceDescriptor)],
    registry: &InterfaceRegistry,
) -> Vec<AnnotationViolation> {
    let signable: Vec<&str> = registry.signing_context().signable_messages().collect();
    let mut violations = Vec::new();

    for (module, service) in descriptors {
        let violation = |method: Option<&str>, kind| AnnotationViolation {
            module: module.clone(),
            service: service.name.clone(),
            method: method.map(str::to_string),
            kind,
        };

        if service.kind == ServiceKind::Msg && !service.msg_service_annotated {
            violations.push(violation(None, ViolationKind::MissingMsgServiceAnnotation));
        }

        for method in &service.methods {
            if service.kind == ServiceKind::Msg
                && !signable.contains(&method.request_type_url.as_str())
            {
                violations.push(violation(Some(&method.name), ViolationKind::UnsignableRequest));
            }
            if method.response_type_url.is_empty() {
                violations.push(violation(Some(&method.name), ViolationKind::MissingResponseType));
            }
        }
    }

    for violation in &violations {
        warn!(%violation, "Service annotation check failed");
    }
    violations
}
