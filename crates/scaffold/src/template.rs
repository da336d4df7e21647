//! Fixed header/source templates and their rendering.
//!
//! Rendering is plain literal substitution of [`PLACEHOLDER`] (and
//! [`NAMESPACE_PLACEHOLDER`]); the templates carry no other variable content.

use crate::name::{Namespace, SubsystemName};

/// Token replaced by the subsystem name.
pub const PLACEHOLDER: &str = "%ss-name%";

/// Token replaced by the inner `msctl` namespace.
pub const NAMESPACE_PLACEHOLDER: &str = "%ss-ns%";

pub const HEADER_TEMPLATE: &str = include_str!("../templates/subsys.h.in");
pub const SOURCE_TEMPLATE: &str = include_str!("../templates/subsys.cpp.in");

const FACTORY_EXPR: &str = "std::make_shared<%ss-name%>";
/// The historical generator emitted this token unreplaced in `create()`.
const LEGACY_FACTORY_EXPR: &str = "std::make_shared<%%ss-name>";

/// How the `create()` factory body refers to the subsystem type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FactoryStyle {
    /// `std::make_shared<Name>( app )`
    #[default]
    Normalized,
    /// `std::make_shared<%%ss-name>( app )`, byte-compatible with older scaffolds.
    Legacy,
}

impl FactoryStyle {
    #[must_use]
    pub const fn from_legacy_flag(legacy: bool) -> Self {
        if legacy { Self::Legacy } else { Self::Normalized }
    }
}

/// The two generated files of one subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSubsystem {
    pub header: String,
    pub source: String,
}

/// Renders the header and source for `name`.
#[must_use]
pub fn render(
    name: &SubsystemName,
    namespace: &Namespace,
    style: FactoryStyle,
) -> RenderedSubsystem {
    let source = match style {
        FactoryStyle::Normalized => substitute(SOURCE_TEMPLATE, name, namespace),
        FactoryStyle::Legacy => {
            substitute(&SOURCE_TEMPLATE.replace(FACTORY_EXPR, LEGACY_FACTORY_EXPR), name, namespace)
        },
    };

    RenderedSubsystem { header: substitute(HEADER_TEMPLATE, name, namespace), source }
}

fn substitute(template: &str, name: &SubsystemName, namespace: &Namespace) -> String {
    template.replace(NAMESPACE_PLACEHOLDER, namespace.as_str()).replace(PLACEHOLDER, name.as_str())
}
