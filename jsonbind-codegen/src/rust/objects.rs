//! Object type code generation.

use crate::descriptor::{
    AccessorDescriptor, AccessorKind, BuilderDescriptor, DescriptorSet, ParameterDescriptor,
    TypeDescriptor, ValueShape,
};
use crate::rust::types::TypeMapper;
use jsonbind_schema::AdditionalPolicy;

/// Generator for object surfaces over shared bindings.
pub struct ObjectGenerator<'a> {
    set: &'a DescriptorSet,
    types: &'a TypeMapper<'a>,
}

impl<'a> ObjectGenerator<'a> {
    /// Creates a new object generator.
    #[must_use]
    pub fn new(set: &'a DescriptorSet, types: &'a TypeMapper<'a>) -> Self {
        Self { set, types }
    }

    /// Generates the struct, its accessors and its builder.
    #[must_use]
    pub fn generate(&self, descriptor: &TypeDescriptor) -> String {
        let rt = self.types.runtime();
        let name = &descriptor.name;
        let mut output = String::new();

        output.push_str(&format!("/// Generated from `{}`.\n", descriptor.path));
        output.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        output.push_str(&format!("pub struct {name} {{\n"));
        output.push_str(&format!("    bindings: {rt}::Bindings,\n"));
        output.push_str("}\n\n");

        output.push_str(&format!("impl Default for {name} {{\n"));
        output.push_str("    fn default() -> Self {\n");
        output.push_str("        Self::new()\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl {name} {{\n"));
        output.push_str(&self.generate_constants(descriptor));
        output.push_str(&self.generate_lifecycle(descriptor));

        for accessor in &descriptor.accessors {
            output.push_str(&self.generate_accessor(descriptor, accessor));
        }

        if descriptor.copier {
            output.push_str("    /// Returns an independent deep copy.\n");
            output.push_str("    #[must_use]\n");
            output.push_str("    pub fn copy(&self) -> Self {\n");
            output.push_str("        Self::from_bindings(self.bindings.deep_copy())\n");
            output.push_str("    }\n\n");
        }

        for view in &descriptor.views {
            if view.declared {
                output.push_str(&format!(
                    "    /// Views this value as `{}`, sharing its bindings.\n",
                    view.interface
                ));
                output.push_str("    #[must_use]\n");
                output.push_str(&format!(
                    "    pub fn {}(&self) -> Box<dyn {}> {{\n",
                    view.conversion, view.interface
                ));
                output.push_str("        Box::new(self.clone())\n");
            } else {
                output.push_str(&format!(
                    "    /// Views this value as a `{}`, sharing its bindings.\n",
                    view.interface
                ));
                output.push_str("    #[must_use]\n");
                output.push_str(&format!(
                    "    pub fn {}(&self) -> {} {{\n",
                    view.conversion, view.interface
                ));
                output.push_str(&format!(
                    "        {}::from_bindings(self.bindings.clone())\n",
                    view.interface
                ));
            }
            output.push_str("    }\n\n");
        }

        output.push_str("}\n\n");

        if let Some(builder) = &descriptor.builder {
            output.push_str(&self.generate_builder(descriptor, builder));
        }

        output
    }

    fn declared_keys(descriptor: &TypeDescriptor) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for accessor in &descriptor.accessors {
            if !matches!(accessor.kind, AccessorKind::Getter | AccessorKind::Setter) {
                continue;
            }
            if let Some(key) = accessor.key.as_deref() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    fn string_slice(values: &[&str]) -> String {
        let items: Vec<String> = values.iter().map(|v| format!("{v:?}")).collect();
        format!("&[{}]", items.join(", "))
    }

    fn generate_constants(&self, descriptor: &TypeDescriptor) -> String {
        let rt = self.types.runtime();
        let mut output = String::new();
        let declared = Self::declared_keys(descriptor);
        let required: Vec<&str> = descriptor
            .constructor
            .iter()
            .flatten()
            .map(|p| p.key.as_str())
            .collect();

        output.push_str("    /// Property keys declared by the schema, in order.\n");
        output.push_str(&format!(
            "    pub const DECLARED: &'static [&'static str] = {};\n",
            Self::string_slice(&declared)
        ));
        output.push_str("    /// Property keys that must be present.\n");
        output.push_str(&format!(
            "    pub const REQUIRED: &'static [&'static str] = {};\n",
            Self::string_slice(&required)
        ));
        if let Some(AdditionalPolicy::ConstrainedByPattern(patterns)) = &descriptor.additional {
            let patterns: Vec<&str> = patterns.iter().map(String::as_str).collect();
            output.push_str("    /// Patterns undeclared keys must match.\n");
            output.push_str(&format!(
                "    pub const KEY_PATTERNS: &'static [&'static str] = {};\n",
                Self::string_slice(&patterns)
            ));
        }
        output.push('\n');

        output.push_str("    /// Scores how well a stored value fits this type; `None` if it cannot.\n");
        output.push_str("    #[must_use]\n");
        output.push_str(&format!(
            "    pub fn match_score(value: &{rt}::Value) -> Option<u32> {{\n"
        ));
        output.push_str("        let bindings = value.as_object()?;\n");
        output.push_str("        if !Self::REQUIRED.iter().all(|key| bindings.contains_key(key)) {\n");
        output.push_str("            return None;\n");
        output.push_str("        }\n");
        match &descriptor.additional {
            Some(AdditionalPolicy::Forbidden) => {
                output.push_str("        let keys = bindings.keys();\n");
                output.push_str(
                    "        if keys.iter().any(|key| !Self::DECLARED.contains(&key.as_str())) {\n",
                );
                output.push_str("            return None;\n");
                output.push_str("        }\n");
            }
            Some(AdditionalPolicy::ConstrainedByPattern(_)) => {
                output.push_str("        let keys = bindings.keys();\n");
                output.push_str("        if keys.iter().any(|key| {\n");
                output.push_str(&format!(
                    "            !Self::DECLARED.contains(&key.as_str()) && !{rt}::key_matches_any(Self::KEY_PATTERNS, key)\n"
                ));
                output.push_str("        }) {\n");
                output.push_str("            return None;\n");
                output.push_str("        }\n");
            }
            _ => {}
        }
        output.push_str(
            "        let present = Self::DECLARED.iter().filter(|key| bindings.contains_key(key)).count();\n",
        );
        output.push_str("        Some(1 + u32::try_from(present).unwrap_or(u32::MAX - 1))\n");
        output.push_str("    }\n\n");
        output
    }

    fn generate_lifecycle(&self, descriptor: &TypeDescriptor) -> String {
        let rt = self.types.runtime();
        let mut output = String::new();

        output.push_str("    /// Creates an empty instance.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub fn new() -> Self {\n");
        output.push_str(&format!(
            "        Self {{ bindings: {rt}::Bindings::new() }}\n"
        ));
        output.push_str("    }\n\n");

        output.push_str("    /// Wraps existing bindings without copying them.\n");
        output.push_str("    #[must_use]\n");
        output.push_str(&format!(
            "    pub fn from_bindings(bindings: {rt}::Bindings) -> Self {{\n"
        ));
        output.push_str("        Self { bindings }\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Returns the underlying bindings.\n");
        output.push_str("    #[must_use]\n");
        output.push_str(&format!(
            "    pub fn bindings(&self) -> &{rt}::Bindings {{\n"
        ));
        output.push_str("        &self.bindings\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Unwraps the underlying bindings.\n");
        output.push_str("    #[must_use]\n");
        output.push_str(&format!(
            "    pub fn into_bindings(self) -> {rt}::Bindings {{\n"
        ));
        output.push_str("        self.bindings\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Returns the compact canonical JSON text.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub fn to_canonical_text(&self) -> String {\n");
        output.push_str("        self.bindings.to_canonical_text()\n");
        output.push_str("    }\n\n");

        if let Some(params) = &descriptor.constructor {
            output.push_str("    /// Creates an instance from its required properties.\n");
            output.push_str("    #[must_use]\n");
            output.push_str(&format!(
                "    pub fn create({}) -> Self {{\n",
                self.parameter_list(params)
            ));
            output.push_str("        let created = Self::new();\n");
            for param in params {
                output.push_str(&self.put_statement(
                    "created.bindings",
                    &param.key,
                    &param.name,
                    &param.shape,
                    param.nullable,
                    "        ",
                ));
            }
            output.push_str("        created\n");
            output.push_str("    }\n\n");
        }

        if let Some(builder) = &descriptor.builder {
            let params = &builder.required;
            let args: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
            output.push_str("    /// Starts a builder from the required properties.\n");
            output.push_str("    #[must_use]\n");
            output.push_str(&format!(
                "    pub fn builder({}) -> {} {{\n",
                self.parameter_list(params),
                builder.name
            ));
            output.push_str(&format!(
                "        {}::new({})\n",
                builder.name,
                args.join(", ")
            ));
            output.push_str("    }\n\n");
        }

        output
    }

    fn parameter_list(&self, params: &[ParameterDescriptor]) -> String {
        params
            .iter()
            .map(|p| format!("{}: {}", p.name, self.types.param_type(&p.shape, p.nullable)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Emits a statement storing `var` under `key`; a nullable `var` is an
    /// `Option` and `None` stores null. A union value is stored with its
    /// alternative tag.
    fn put_statement(
        &self,
        target: &str,
        key: &str,
        var: &str,
        shape: &ValueShape,
        nullable: bool,
        indent: &str,
    ) -> String {
        let rt = self.types.runtime();
        let tagged = self.types.union_name(shape).is_some();
        if nullable && tagged {
            format!(
                "{indent}match &{var} {{\n\
                 {indent}    Some({var}) => {target}.put_alternative({key:?}, {var}.to_value(), {var}.alternative()),\n\
                 {indent}    None => {target}.put({key:?}, {rt}::Value::Null),\n\
                 {indent}}};\n"
            )
        } else if nullable {
            format!(
                "{indent}{target}.put({key:?}, match &{var} {{\n\
                 {indent}    Some({var}) => {},\n\
                 {indent}    None => {rt}::Value::Null,\n\
                 {indent}}});\n",
                self.types.encode_expr(shape, var, 0)
            )
        } else if tagged {
            format!(
                "{indent}{target}.put_alternative({key:?}, {var}.to_value(), {var}.alternative());\n"
            )
        } else {
            format!(
                "{indent}{target}.put({key:?}, {});\n",
                self.types.encode_expr(shape, var, 0)
            )
        }
    }

    fn generate_accessor(&self, descriptor: &TypeDescriptor, accessor: &AccessorDescriptor) -> String {
        let key = accessor.key.as_deref().unwrap_or_default();
        match accessor.kind {
            AccessorKind::Getter => self.generate_getter(accessor, key),
            AccessorKind::Setter => self.generate_setter(accessor, key),
            AccessorKind::QualifiedGetter { union, alternative } => {
                self.generate_qualified_getter(accessor, key, union, alternative)
            }
            AccessorKind::QualifiedSetter { alternative, .. } => {
                self.generate_qualified_setter(accessor, key, alternative)
            }
            AccessorKind::GenericGet => self.generate_generic_get(),
            AccessorKind::GenericPut => self.generate_generic_put(descriptor),
            AccessorKind::ElementGetter { .. } => String::new(),
        }
    }

    /// Returns the decode expression for a property getter. A union reads
    /// the alternative it was last written as, if tagged.
    fn property_decode(&self, shape: &ValueShape, key: &str) -> String {
        match self.types.union_name(shape) {
            Some(union) => format!(
                "match self.bindings.alternative({key:?}) {{ \
                 Some(index) => {union}::from_alternative(value, index), \
                 None => {union}::from_value(value) }}"
            ),
            None => self.types.decode_expr(shape, "value", 0),
        }
    }

    fn generate_getter(&self, accessor: &AccessorDescriptor, key: &str) -> String {
        let rt = self.types.runtime();
        let mut output = String::new();

        output.push_str(&format!("    /// Reads `{key}`.\n"));
        output.push_str("    ///\n");
        output.push_str("    /// # Errors\n");
        output.push_str("    /// Returns `FormatError` if the stored value does not decode.\n");
        output.push_str(&format!(
            "    pub fn {}(&self) -> {} {{\n",
            accessor.name,
            self.types.getter_type(accessor)
        ));
        if accessor.optional() {
            output.push_str(&format!("        match self.bindings.get({key:?}) {{\n"));
            output.push_str(&format!("            None | Some({rt}::Value::Null) => Ok(None),\n"));
            output.push_str(&format!(
                "            Some(ref value) => ({}).map(Some),\n",
                self.property_decode(&accessor.shape, key)
            ));
            output.push_str("        }\n");
        } else {
            output.push_str(&format!(
                "        let value = &self.bindings.get({key:?}).unwrap_or_default();\n"
            ));
            output.push_str(&format!(
                "        {}\n",
                self.property_decode(&accessor.shape, key)
            ));
        }
        output.push_str("    }\n\n");
        output
    }

    fn generate_setter(&self, accessor: &AccessorDescriptor, key: &str) -> String {
        let rt = self.types.runtime();
        let mut output = String::new();

        output.push_str(&format!("    /// Writes `{key}`.\n"));
        output.push_str(&format!(
            "    pub fn {}(&mut self, value: {}) -> &mut Self {{\n",
            accessor.name,
            self.types.setter_type(accessor)
        ));
        if accessor.optional() {
            let absent = if accessor.nullable {
                format!("self.bindings.put({key:?}, {rt}::Value::Null)")
            } else {
                format!("self.bindings.remove({key:?})")
            };
            let store = if self.types.union_name(&accessor.shape).is_some() {
                format!("self.bindings.put_alternative({key:?}, value.to_value(), value.alternative())")
            } else {
                format!(
                    "self.bindings.put({key:?}, {})",
                    self.types.encode_expr(&accessor.shape, "value", 0)
                )
            };
            output.push_str("        match value {\n");
            output.push_str(&format!("            Some(value) => {store},\n"));
            output.push_str(&format!("            None => {absent},\n"));
            output.push_str("        };\n");
        } else {
            output.push_str(&self.put_statement(
                "self.bindings",
                key,
                "value",
                &accessor.shape,
                false,
                "        ",
            ));
        }
        output.push_str("        self\n");
        output.push_str("    }\n\n");
        output
    }

    fn generate_qualified_getter(
        &self,
        accessor: &AccessorDescriptor,
        key: &str,
        union: jsonbind_schema::TypeId,
        alternative: usize,
    ) -> String {
        let rt = self.types.runtime();
        let Some(owner) = self.set.get(union) else {
            return String::new();
        };
        let Some(variant) = owner.alternatives.get(alternative) else {
            return String::new();
        };
        let mut output = String::new();

        output.push_str(&format!(
            "    /// Reads `{key}` when it holds the `{}` alternative.\n",
            variant.name
        ));
        output.push_str("    ///\n");
        output.push_str("    /// # Errors\n");
        output.push_str("    /// Returns `FormatError` if the stored value does not decode.\n");
        output.push_str(&format!(
            "    pub fn {}(&self) -> Result<Option<{}>, {rt}::FormatError> {{\n",
            accessor.name,
            self.types.rust_type(&accessor.shape)
        ));
        output.push_str(&format!("        match self.bindings.get({key:?}) {{\n"));
        output.push_str(&format!("            None | Some({rt}::Value::Null) => Ok(None),\n"));
        output.push_str(&format!(
            "            Some(ref value) => match self.bindings.alternative({key:?}) {{\n"
        ));
        output.push_str(&format!(
            "                Some({alternative}) => ({}).map(Some),\n",
            self.types.decode_expr(&accessor.shape, "value", 0)
        ));
        output.push_str("                Some(_) => Ok(None),\n");
        output.push_str(&format!(
            "                None => match {}::from_value(value) {{\n",
            owner.name
        ));
        output.push_str(&format!(
            "                    Ok({}::{}(inner)) => Ok(Some(inner)),\n",
            owner.name, variant.variant
        ));
        output.push_str("                    _ => Ok(None),\n");
        output.push_str("                },\n");
        output.push_str("            },\n");
        output.push_str("        }\n");
        output.push_str("    }\n\n");
        output
    }

    fn generate_qualified_setter(
        &self,
        accessor: &AccessorDescriptor,
        key: &str,
        alternative: usize,
    ) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "    /// Writes `{key}` as a `{}`.\n",
            accessor.shape.describe()
        ));
        output.push_str(&format!(
            "    pub fn {}(&mut self, value: {}) -> &mut Self {{\n",
            accessor.name,
            self.types.rust_type(&accessor.shape)
        ));
        output.push_str(&format!(
            "        self.bindings.put_alternative({key:?}, {}, {alternative});\n",
            self.types.encode_expr(&accessor.shape, "value", 0)
        ));
        output.push_str("        self\n");
        output.push_str("    }\n\n");
        output
    }

    fn generate_generic_get(&self) -> String {
        let rt = self.types.runtime();
        let mut output = String::new();
        output.push_str("    /// Reads any stored key.\n");
        output.push_str("    #[must_use]\n");
        output.push_str(&format!(
            "    pub fn get(&self, key: &str) -> Option<{rt}::Value> {{\n"
        ));
        output.push_str("        self.bindings.get(key)\n");
        output.push_str("    }\n\n");
        output
    }

    fn generate_generic_put(&self, descriptor: &TypeDescriptor) -> String {
        let rt = self.types.runtime();
        let mut output = String::new();

        if let Some(AdditionalPolicy::ConstrainedByPattern(_)) = &descriptor.additional {
            output.push_str("    /// Stores a value under a declared key or one matching `KEY_PATTERNS`.\n");
            output.push_str("    ///\n");
            output.push_str("    /// # Errors\n");
            output.push_str("    /// Returns `AccessError::RejectedKey` for any other key.\n");
            output.push_str(&format!(
                "    pub fn put(&mut self, key: impl Into<String>, value: impl Into<{rt}::Value>) -> Result<Option<{rt}::Value>, {rt}::AccessError> {{\n"
            ));
            output.push_str("        let key = key.into();\n");
            output.push_str(&format!(
                "        if !Self::DECLARED.contains(&key.as_str()) && !{rt}::key_matches_any(Self::KEY_PATTERNS, &key) {{\n"
            ));
            output.push_str(&format!(
                "            return Err({rt}::AccessError::RejectedKey {{ type_name: {:?}.to_string(), key }});\n",
                descriptor.name
            ));
            output.push_str("        }\n");
            output.push_str("        Ok(self.bindings.put(key, value))\n");
        } else {
            output.push_str("    /// Stores a value under any key, returning the previous one.\n");
            output.push_str(&format!(
                "    pub fn put(&mut self, key: impl Into<String>, value: impl Into<{rt}::Value>) -> Option<{rt}::Value> {{\n"
            ));
            output.push_str("        self.bindings.put(key, value)\n");
        }
        output.push_str("    }\n\n");
        output
    }

    fn generate_builder(&self, descriptor: &TypeDescriptor, builder: &BuilderDescriptor) -> String {
        let rt = self.types.runtime();
        let name = &builder.name;
        let target = &descriptor.name;
        let args: Vec<&str> = builder.required.iter().map(|p| p.name.as_str()).collect();
        let mut output = String::new();

        output.push_str(&format!("/// Builder for [`{target}`].\n"));
        output.push_str("#[derive(Debug, Clone)]\n");
        output.push_str(&format!("pub struct {name} {{\n"));
        output.push_str(&format!("    bindings: {rt}::Bindings,\n"));
        output.push_str("}\n\n");

        output.push_str(&format!("impl {name} {{\n"));
        output.push_str("    /// Starts from the required properties.\n");
        output.push_str("    #[must_use]\n");
        output.push_str(&format!(
            "    pub fn new({}) -> Self {{\n",
            self.parameter_list(&builder.required)
        ));
        output.push_str(&format!(
            "        Self {{ bindings: {target}::create({}).into_bindings() }}\n",
            args.join(", ")
        ));
        output.push_str("    }\n\n");

        for step in &builder.steps {
            output.push_str(&format!("    /// Sets `{}`.\n", step.key));
            output.push_str("    #[must_use]\n");
            output.push_str(&format!(
                "    pub fn {}(self, value: {}) -> Self {{\n",
                step.method,
                self.types.param_type(&step.shape, step.nullable)
            ));
            output.push_str(&self.put_statement(
                "self.bindings",
                &step.key,
                "value",
                &step.shape,
                step.nullable,
                "        ",
            ));
            output.push_str("        self\n");
            output.push_str("    }\n\n");
        }

        output.push_str(&format!("    /// Finishes the [`{target}`].\n"));
        output.push_str("    #[must_use]\n");
        output.push_str(&format!("    pub fn build(self) -> {target} {{\n"));
        output.push_str(&format!("        {target}::from_bindings(self.bindings)\n"));
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }
}
