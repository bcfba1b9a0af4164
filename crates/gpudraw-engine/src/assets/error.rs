use std::fmt;
use std::path::PathBuf;

/// Failure while turning OBJ text into a vertex stream.
#[derive(Debug)]
pub enum MeshError {
    /// `tobj` rejected the input.
    Parse(tobj::LoadError),
    /// The file parsed but contained no triangles.
    Empty,
    /// Face indices referenced attributes that do not exist.
    IndexOutOfRange { index: u32, len: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "obj parse error: {e}"),
            Self::Empty => f.write_str("mesh contains no triangles"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "vertex index {index} out of range ({len} vertices)")
            }
        }
    }
}

impl std::error::Error for MeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// Failure while decoding or validating a shader binary.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    Empty,
    /// Neither a SPIR-V word stream nor UTF-8 WGSL text.
    UnknownFormat,
    /// SPIR-V magic present but the byte length is not a multiple of 4.
    Misaligned { len: usize },
    Invalid(String),
    MissingEntryPoint { name: String, stage: &'static str },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("shader binary is empty"),
            Self::UnknownFormat => f.write_str("shader is neither SPIR-V nor UTF-8 WGSL"),
            Self::Misaligned { len } => {
                write!(f, "SPIR-V length {len} is not a multiple of 4 bytes")
            }
            Self::Invalid(msg) => write!(f, "shader failed validation: {msg}"),
            Self::MissingEntryPoint { name, stage } => {
                write!(f, "no {stage} entry point named `{name}`")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// Asset failure tagged with the path that caused it.
///
/// Every variant is terminal for the session; nothing is retried.
#[derive(Debug)]
pub enum AssetError {
    Fetch {
        path: PathBuf,
        source: std::io::Error,
    },
    Mesh {
        path: PathBuf,
        source: MeshError,
    },
    Shader {
        path: PathBuf,
        source: ShaderError,
    },
}

impl AssetError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Fetch { path, .. } | Self::Mesh { path, .. } | Self::Shader { path, .. } => path,
        }
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { path, source } => {
                write!(f, "can't load {}: {source}", path.display())
            }
            Self::Mesh { path, source } => write!(f, "bad mesh {}: {source}", path.display()),
            Self::Shader { path, source } => {
                write!(f, "bad shader {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch { source, .. } => Some(source),
            Self::Mesh { source, .. } => Some(source),
            Self::Shader { source, .. } => Some(source),
        }
    }
}
