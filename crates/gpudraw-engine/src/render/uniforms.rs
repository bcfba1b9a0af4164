use wgpu::util::DeviceExt;

use crate::scene::{TRANSFORM_BYTES, TransformUniform};

use super::{StagingCell, StagingState};

/// Shader-bound uniform buffer plus its host-writable staging twin.
///
/// Each frame the staging buffer is written while mapped, unmapped, copied into
/// the uniform buffer by the frame's encoder, and re-mapped after submission.
pub struct UniformPair {
    uniform: wgpu::Buffer,
    staging: wgpu::Buffer,
    cell: StagingCell,
    skipped_writes: u64,
}

impl UniformPair {
    /// Creates both buffers holding `initial`. The staging buffer starts mapped
    /// so the first frame can write immediately.
    pub fn new(device: &wgpu::Device, initial: &TransformUniform) -> Self {
        let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gpudraw transform ubo"),
            contents: bytemuck::bytes_of(initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gpudraw transform staging"),
            size: TRANSFORM_BYTES,
            usage: wgpu::BufferUsages::MAP_WRITE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: true,
        });
        {
            let mut view = staging.slice(..).get_mapped_range_mut();
            view.copy_from_slice(bytemuck::bytes_of(initial));
        }

        Self {
            uniform,
            staging,
            cell: StagingCell::new(StagingState::Writable),
            skipped_writes: 0,
        }
    }

    pub fn uniform_buffer(&self) -> &wgpu::Buffer {
        &self.uniform
    }

    /// Writes skipped because the staging buffer was not mapped in time.
    pub fn skipped_writes(&self) -> u64 {
        self.skipped_writes
    }

    /// Writes `data` into the staging buffer and records the copy into the
    /// uniform buffer. Returns `false` (and records nothing) if the previous
    /// remap has not resolved yet.
    pub fn stage(&mut self, data: &TransformUniform, encoder: &mut wgpu::CommandEncoder) -> bool {
        if !self.cell.begin_write() {
            self.skipped_writes += 1;
            log::trace!("staging buffer not mapped yet; keeping last uniform");
            return false;
        }

        {
            let mut view = self.staging.slice(..).get_mapped_range_mut();
            view.copy_from_slice(bytemuck::bytes_of(data));
        }
        self.staging.unmap();

        encoder.copy_buffer_to_buffer(&self.staging, 0, &self.uniform, 0, TRANSFORM_BYTES);
        true
    }

    /// Requests host-write access again once the submitted copy is done.
    ///
    /// Must be called after the encoder holding the copy has been submitted.
    /// A failed map is dropped silently; the next call retries it.
    pub fn request_remap(&self) {
        if !self.cell.begin_remap() {
            return;
        }

        let cell = self.cell.clone();
        self.staging
            .slice(..)
            .map_async(wgpu::MapMode::Write, move |result| {
                if let Err(e) = &result {
                    log::trace!("staging remap failed: {e}");
                }
                cell.finish_remap(result.is_ok());
            });
    }
}
