use crate::{AudioError, CoreResult};

use std::panic::Location;

use audioadapter_buffers::direct::InterleavedSlice;
use error_location::ErrorLocation;
use rubato::{Fft, FixedSync, Resampler as RubatoResampler};
use tracing::{debug, instrument};

const CHUNK_SIZE: usize = 1024;
const SUB_CHUNKS: usize = 2;

/// Mono sample-rate converter bridging clip and output-device rates.
pub(crate) struct Resampler {
    resampler: Fft<f32>,
    input_rate: u32,
    output_rate: u32,
}

impl Resampler {
    #[track_caller]
    #[instrument]
    pub(crate) fn new(input_rate: u32, output_rate: u32) -> CoreResult<Self> {
        let resampler = Fft::<f32>::new(
            input_rate as usize,
            output_rate as usize,
            CHUNK_SIZE,
            SUB_CHUNKS,
            1,
            FixedSync::Input,
        )
        .map_err(|e| AudioError::ResamplingError {
            reason: format!("Failed to create resampler: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
        })
    }

    #[track_caller]
    #[instrument(skip(self, samples))]
    pub(crate) fn resample(&mut self, samples: &[f32]) -> CoreResult<Vec<f32>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let expected_len =
            (samples.len() as f64 * self.output_rate as f64 / self.input_rate as f64) as usize;
        let mut output = Vec::with_capacity(expected_len + 2 * CHUNK_SIZE);

        let delay = self.resampler.output_delay();
        let mut input_chunk = vec![0.0f32; CHUNK_SIZE];
        let mut output_chunk = vec![0.0f32; self.resampler.output_frames_max()];

        for chunk in samples.chunks(CHUNK_SIZE) {
            // The final chunk is zero-padded; the padding is cut by the truncate below.
            input_chunk[..chunk.len()].copy_from_slice(chunk);
            input_chunk[chunk.len()..].fill(0.0);
            self.process_chunk(&input_chunk, &mut output_chunk, &mut output)?;
        }

        // The first `delay` output frames precede the signal. Flush silence
        // until the tail of the clip has come out too.
        input_chunk.fill(0.0);
        while output.len() < delay + expected_len {
            self.process_chunk(&input_chunk, &mut output_chunk, &mut output)?;
        }

        output.drain(..delay);
        output.truncate(expected_len);

        debug!(
            input_len = samples.len(),
            output_len = output.len(),
            input_rate = self.input_rate,
            output_rate = self.output_rate,
            "Clip resampled"
        );

        Ok(output)
    }

    #[track_caller]
    fn process_chunk(
        &mut self,
        input_chunk: &[f32],
        output_chunk: &mut [f32],
        output: &mut Vec<f32>,
    ) -> CoreResult<()> {
        let input_adapter = InterleavedSlice::new(input_chunk, 1, CHUNK_SIZE).map_err(|e| {
            AudioError::ResamplingError {
                reason: format!("Failed to create input adapter: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let output_frames = output_chunk.len();
        let mut output_adapter = InterleavedSlice::new_mut(output_chunk, 1, output_frames)
            .map_err(|e| AudioError::ResamplingError {
                reason: format!("Failed to create output adapter: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let (_input_frames, written) = self
            .resampler
            .process_into_buffer(&input_adapter, &mut output_adapter, None)
            .map_err(|e| AudioError::ResamplingError {
                reason: format!("Resampling failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        output.extend_from_slice(&output_chunk[..written]);
        Ok(())
    }
}

/// Convert `samples` from `input_rate` to `output_rate`, passing them through
/// untouched when the rates already match.
pub(crate) fn convert_rate(
    samples: Vec<f32>,
    input_rate: u32,
    output_rate: u32,
) -> CoreResult<Vec<f32>> {
    if input_rate == output_rate {
        return Ok(samples);
    }

    Resampler::new(input_rate, output_rate)?.resample(&samples)
}
