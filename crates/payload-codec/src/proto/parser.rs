use crate::error::{Error, Result};
use crate::proto::message_type::MessageType;
use crate::proto::names::{SchemaPaths, TypeName};
use protobuf::reflect::{FileDescriptor, MessageDescriptor};
use protobuf_parse::Parser;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for schema loading
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Extra directories searched for `import`ed files
    ///
    /// The parent directory of every input file is always searched, so this is
    /// only needed for imports that live outside those directories.
    pub include_paths: Vec<PathBuf>,
}

/// A parsed protobuf schema: every file given, plus the files they import
#[derive(Debug, Clone)]
pub struct SchemaRoot {
    files: Vec<FileDescriptor>,
}

impl SchemaRoot {
    /// Load and parse the .proto file(s) at `paths`
    ///
    /// Parsing reads files synchronously, so it runs on the blocking pool.
    pub async fn load(paths: impl Into<SchemaPaths>, options: &LoadOptions) -> Result<Self> {
        let paths = paths.into();
        let options = options.clone();
        tokio::task::spawn_blocking(move || Self::from_files(&paths, &options))
            .await
            .map_err(|e| Error::SchemaLoad(format!("Schema loading task failed: {e}")))?
    }

    /// Parse the .proto file(s) at `paths` on the current thread
    pub fn from_files(paths: &SchemaPaths, options: &LoadOptions) -> Result<Self> {
        if paths.is_empty() {
            return Err(Error::SchemaLoad("No schema paths given".to_string()));
        }

        let mut parser = Parser::new();
        parser.pure();

        let mut includes: Vec<PathBuf> = Vec::new();
        for path in paths.iter() {
            // Inputs must sit under an include directory, so both are made absolute.
            let input = path.canonicalize().map_err(|e| {
                Error::SchemaLoad(format!("Failed to open {}: {e}", path.display()))
            })?;
            if !input.is_file() {
                return Err(Error::SchemaLoad(format!(
                    "Not a file: {}",
                    path.display()
                )));
            }
            if let Some(parent) = input.parent() {
                push_unique(&mut includes, parent);
            }
            parser.input(&input);
        }
        for include in &options.include_paths {
            let include = include.canonicalize().map_err(|e| {
                Error::SchemaLoad(format!(
                    "Failed to open include path {}: {e}",
                    include.display()
                ))
            })?;
            push_unique(&mut includes, &include);
        }
        for include in &includes {
            parser.include(include);
        }

        let parsed = parser
            .parse_and_typecheck()
            .map_err(|e| Error::SchemaLoad(format!("{e:#}")))?;

        let files = FileDescriptor::new_dynamic_fds(parsed.file_descriptors, &[])
            .map_err(|e| Error::SchemaLoad(e.to_string()))?;

        debug!(
            "Loaded schema from {} path(s): {} file descriptor(s)",
            paths.len(),
            files.len()
        );

        Ok(SchemaRoot { files })
    }

    /// Parse .proto file content from a string
    pub fn from_string(content: &str) -> Result<Self> {
        use std::io::Write;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("schema.proto");
        let mut file = std::fs::File::create(&path)?;
        file.write_all(content.as_bytes())?;
        drop(file);

        Self::from_files(&SchemaPaths::from(path), &LoadOptions::default())
    }

    /// Resolve a message type by name
    ///
    /// Resolution order:
    /// 1. an absolute name (leading `.`) must match a full name exactly;
    /// 2. an exact full-name match (`pkg.Outer.Inner`);
    /// 3. the first message, in load and declaration order, whose full name
    ///    ends with `.<name>`.
    pub fn lookup_type(&self, name: impl Into<TypeName>) -> Result<MessageType> {
        let name = name.into();
        let descriptor = match name.absolute() {
            Some(full_name) => self.messages().find(|m| m.full_name() == full_name),
            None => {
                let relative = name.as_str();
                let suffix = format!(".{relative}");
                self.messages()
                    .find(|m| m.full_name() == relative)
                    .or_else(|| self.messages().find(|m| m.full_name().ends_with(&suffix)))
            }
        };

        let descriptor = descriptor.ok_or_else(|| Error::TypeNotFound(name.to_string()))?;
        debug!("Resolved type '{}' to {}", name, descriptor.full_name());
        Ok(MessageType::new(descriptor))
    }

    /// List all message types in the schema by full name
    pub fn list_types(&self) -> Vec<String> {
        self.messages().map(|m| m.full_name().to_string()).collect()
    }

    /// The file descriptors backing this schema, in load order
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// Every message, depth-first in declaration order, skipping map entries
    fn messages(&self) -> impl Iterator<Item = MessageDescriptor> + '_ {
        let mut all = Vec::new();
        for file in &self.files {
            for message in file.messages() {
                collect_messages(message, &mut all);
            }
        }
        all.into_iter()
    }
}

fn collect_messages(message: MessageDescriptor, all: &mut Vec<MessageDescriptor>) {
    if message.is_map_entry() {
        return;
    }
    let nested: Vec<MessageDescriptor> = message.nested_messages().collect();
    all.push(message);
    for inner in nested {
        collect_messages(inner, all);
    }
}

fn push_unique(includes: &mut Vec<PathBuf>, dir: &Path) {
    if !includes.iter().any(|existing| existing == dir) {
        includes.push(dir.to_path_buf());
    }
}
