//! Declared interface code generation.

use crate::capability::{InterfaceDecl, MemberRole, MemberSignature};
use crate::descriptor::DescriptorSet;
use crate::rust::types::TypeMapper;

/// Generator for declared interfaces and their structural implementations.
pub struct InterfaceGenerator<'a> {
    set: &'a DescriptorSet,
    types: &'a TypeMapper<'a>,
}

impl<'a> InterfaceGenerator<'a> {
    /// Creates a new interface generator.
    #[must_use]
    pub fn new(set: &'a DescriptorSet, types: &'a TypeMapper<'a>) -> Self {
        Self { set, types }
    }

    /// Generates every declared interface with an impl per implementor.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        for interface in self.set.interfaces() {
            output.push_str(&self.generate_trait(interface));
            for target in self.set.capabilities().implementors(&interface.name) {
                if let Some(descriptor) = self.set.get(target) {
                    output.push_str(&self.generate_impl(interface, &descriptor.name));
                }
            }
        }
        output
    }

    fn signature(&self, member: &MemberSignature) -> String {
        let rt = self.types.runtime();
        let ty = self.types.rust_type(&member.shape);
        match member.role {
            MemberRole::Getter if member.optional => format!(
                "fn {}(&self) -> Result<Option<{ty}>, {rt}::FormatError>",
                member.name
            ),
            MemberRole::Getter => {
                format!("fn {}(&self) -> Result<{ty}, {rt}::FormatError>", member.name)
            }
            MemberRole::Setter => format!(
                "fn {}(&mut self, value: {})",
                member.name,
                self.types.param_type(&member.shape, member.optional)
            ),
        }
    }

    fn generate_trait(&self, interface: &InterfaceDecl) -> String {
        let mut output = String::new();
        output.push_str(&format!("/// Structural interface `{}`.\n", interface.name));
        output.push_str(&format!("pub trait {} {{\n", interface.name));
        for member in &interface.members {
            match member.role {
                MemberRole::Getter => output.push_str(&format!("    /// Reads `{}`.\n", member.name)),
                MemberRole::Setter => output.push_str(&format!("    /// Writes through `{}`.\n", member.name)),
            }
            if member.role == MemberRole::Getter {
                output.push_str("    ///\n");
                output.push_str("    /// # Errors\n");
                output.push_str("    /// Returns `FormatError` if the stored value does not decode.\n");
            }
            output.push_str(&format!("    {};\n", self.signature(member)));
        }
        output.push_str("}\n\n");
        output
    }

    fn generate_impl(&self, interface: &InterfaceDecl, target: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("impl {} for {target} {{\n", interface.name));
        for member in &interface.members {
            output.push_str(&format!("    {} {{\n", self.signature(member)));
            match member.role {
                MemberRole::Getter => {
                    output.push_str(&format!("        Self::{}(self)\n", member.name));
                }
                MemberRole::Setter => {
                    output.push_str(&format!("        Self::{}(self, value);\n", member.name));
                }
            }
            output.push_str("    }\n");
        }
        output.push_str("}\n\n");
        output
    }
}
