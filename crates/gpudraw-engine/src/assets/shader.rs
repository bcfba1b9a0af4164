use std::borrow::Cow;

use super::ShaderError;

const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Pipeline stage a shader module is loaded for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }

    fn to_naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

/// A decoded shader binary.
///
/// Precompiled SPIR-V is recognised by its magic number; anything else must be
/// UTF-8 WGSL source.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderBinary {
    SpirV(Vec<u32>),
    Wgsl(String),
}

impl ShaderBinary {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ShaderError> {
        if bytes.is_empty() {
            return Err(ShaderError::Empty);
        }

        if let Some(head) = bytes.first_chunk::<4>() {
            let swapped = match *head {
                h if u32::from_le_bytes(h) == SPIRV_MAGIC => Some(false),
                h if u32::from_be_bytes(h) == SPIRV_MAGIC => Some(true),
                _ => None,
            };
            if let Some(swapped) = swapped {
                return Self::spirv_words(bytes, swapped).map(Self::SpirV);
            }
        }

        std::str::from_utf8(bytes)
            .map(|s| Self::Wgsl(s.to_owned()))
            .map_err(|_| ShaderError::UnknownFormat)
    }

    fn spirv_words(bytes: &[u8], swapped: bool) -> Result<Vec<u32>, ShaderError> {
        if bytes.len() % 4 != 0 {
            return Err(ShaderError::Misaligned { len: bytes.len() });
        }
        Ok(bytes
            .chunks_exact(4)
            .map(|c| {
                let word = [c[0], c[1], c[2], c[3]];
                if swapped {
                    u32::from_be_bytes(word)
                } else {
                    u32::from_le_bytes(word)
                }
            })
            .collect())
    }

    /// Parses and validates the module, and checks that `entry_point` exists
    /// for `stage`. This catches broken shaders before the device sees them.
    pub fn validate(&self, stage: ShaderStage, entry_point: &str) -> Result<(), ShaderError> {
        let module = match self {
            Self::SpirV(words) => naga::front::spv::Frontend::new(
                words.iter().copied(),
                &naga::front::spv::Options::default(),
            )
            .parse()
            .map_err(|e| ShaderError::Invalid(e.to_string()))?,
            Self::Wgsl(src) => naga::front::wgsl::parse_str(src)
                .map_err(|e| ShaderError::Invalid(e.emit_to_string(src)))?,
        };

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .map_err(|e| ShaderError::Invalid(e.into_inner().to_string()))?;

        let found = module
            .entry_points
            .iter()
            .any(|ep| ep.name == entry_point && ep.stage == stage.to_naga());
        if !found {
            return Err(ShaderError::MissingEntryPoint {
                name: entry_point.to_string(),
                stage: stage.name(),
            });
        }
        Ok(())
    }

    pub fn source(&self) -> wgpu::ShaderSource<'_> {
        match self {
            Self::SpirV(words) => wgpu::ShaderSource::SpirV(Cow::Borrowed(words)),
            Self::Wgsl(src) => wgpu::ShaderSource::Wgsl(Cow::Borrowed(src)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX_WGSL: &str = "
@vertex
fn main(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(pos, 1.0);
}
";

    #[test]
    fn spirv_magic_is_detected() {
        let mut bytes = SPIRV_MAGIC.to_le_bytes().to_vec();
        bytes.extend_from_slice(&0x0001_0000u32.to_le_bytes());
        let bin = ShaderBinary::from_bytes(&bytes).unwrap();
        assert_eq!(bin, ShaderBinary::SpirV(vec![SPIRV_MAGIC, 0x0001_0000]));
    }

    #[test]
    fn big_endian_spirv_is_swapped() {
        let bytes = SPIRV_MAGIC.to_be_bytes();
        let bin = ShaderBinary::from_bytes(&bytes).unwrap();
        assert_eq!(bin, ShaderBinary::SpirV(vec![SPIRV_MAGIC]));
    }

    #[test]
    fn truncated_spirv_is_rejected() {
        let mut bytes = SPIRV_MAGIC.to_le_bytes().to_vec();
        bytes.push(0);
        assert_eq!(
            ShaderBinary::from_bytes(&bytes),
            Err(ShaderError::Misaligned { len: 5 })
        );
    }

    #[test]
    fn text_is_wgsl() {
        let bin = ShaderBinary::from_bytes(VERTEX_WGSL.as_bytes()).unwrap();
        assert!(matches!(bin, ShaderBinary::Wgsl(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(
            ShaderBinary::from_bytes(&[0xff, 0xfe, 0x00, 0x80, 0xc0]),
            Err(ShaderError::UnknownFormat)
        );
        assert_eq!(ShaderBinary::from_bytes(&[]), Err(ShaderError::Empty));
    }

    #[test]
    fn valid_wgsl_passes() {
        let bin = ShaderBinary::Wgsl(VERTEX_WGSL.to_string());
        assert_eq!(bin.validate(ShaderStage::Vertex, "main"), Ok(()));
    }

    #[test]
    fn wrong_stage_is_missing_entry_point() {
        let bin = ShaderBinary::Wgsl(VERTEX_WGSL.to_string());
        assert!(matches!(
            bin.validate(ShaderStage::Fragment, "main"),
            Err(ShaderError::MissingEntryPoint { .. })
        ));
    }

    #[test]
    fn syntax_error_is_invalid() {
        let bin = ShaderBinary::Wgsl("fn main( {".to_string());
        assert!(matches!(
            bin.validate(ShaderStage::Vertex, "main"),
            Err(ShaderError::Invalid(_))
        ));
    }

    #[test]
    fn truncated_spirv_module_is_invalid() {
        let bin = ShaderBinary::SpirV(vec![SPIRV_MAGIC, 0x0001_0000]);
        assert!(matches!(
            bin.validate(ShaderStage::Vertex, "main"),
            Err(ShaderError::Invalid(_))
        ));
    }

    fn compile_to_spirv(wgsl: &str) -> Vec<u32> {
        let module = naga::front::wgsl::parse_str(wgsl).unwrap();
        let info = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap();
        naga::back::spv::write_vec(&module, &info, &naga::back::spv::Options::default(), None)
            .unwrap()
    }

    #[test]
    fn shipped_shaders_compiled_to_spirv_validate_in_both_byte_orders() {
        let dir =
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/shaders/basic");
        for (file, stage) in [
            ("basic.vert.wgsl", ShaderStage::Vertex),
            ("basic.frag.wgsl", ShaderStage::Fragment),
        ] {
            let wgsl = std::fs::read_to_string(dir.join(file)).unwrap();
            let words = compile_to_spirv(&wgsl);
            let le: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
            let be: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();

            for bytes in [le, be] {
                let bin = ShaderBinary::from_bytes(&bytes).unwrap();
                assert_eq!(bin, ShaderBinary::SpirV(words.clone()), "{file}");
                assert_eq!(bin.validate(stage, "main"), Ok(()), "{file}");
                assert!(matches!(bin.source(), wgpu::ShaderSource::SpirV(_)));
            }
        }
    }

    #[test]
    fn shipped_shaders_validate() {
        let dir =
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/shaders/basic");
        let vert = std::fs::read(dir.join("basic.vert.wgsl")).unwrap();
        let frag = std::fs::read(dir.join("basic.frag.wgsl")).unwrap();
        ShaderBinary::from_bytes(&vert)
            .unwrap()
            .validate(ShaderStage::Vertex, "main")
            .unwrap();
        ShaderBinary::from_bytes(&frag)
            .unwrap()
            .validate(ShaderStage::Fragment, "main")
            .unwrap();
    }
}
