use std::collections::VecDeque;

/// Samples kept for analysis
pub const FFT_SIZE: usize = 2048;
/// Samples handed out per frame, half the analysis window
pub const FRAME_SIZE: usize = FFT_SIZE / 2;
/// Byte value of a zero-amplitude sample
pub const SILENCE_BYTE: u8 = 128;

/// One snapshot of the output waveform, as unsigned bytes centred on 128
pub type SampleFrame = Vec<u8>;

/// Convert a float sample to the byte encoding used by [`SampleFrame`]
pub fn sample_to_byte(sample: f32) -> u8 {
    (128.0 * (1.0 + sample)).clamp(0.0, 255.0) as u8
}

/// Read-only tap on the master bus output
pub struct Analyzer {
    samples: VecDeque<f32>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(FFT_SIZE),
        }
    }

    /// Record one post-master sample. Does not alter the signal.
    pub fn push(&mut self, sample: f32) {
        if self.samples.len() >= FFT_SIZE {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// The most recent [`FRAME_SIZE`] samples, oldest first.
    ///
    /// Always returns a full frame; positions not yet covered by recorded
    /// audio read as silence.
    #[cfg(test)]
    pub fn frame(&self) -> SampleFrame {
        let mut frame = vec![SILENCE_BYTE; FRAME_SIZE];
        self.fill_frame(&mut frame);
        frame
    }

    /// Fill `frame` with the latest samples, right-aligned
    pub fn fill_frame(&self, frame: &mut [u8]) {
        let available = self.samples.len().min(frame.len());
        let pad = frame.len() - available;
        frame[..pad].fill(SILENCE_BYTE);

        let skip = self.samples.len() - available;
        for (slot, sample) in frame[pad..].iter_mut().zip(self.samples.iter().skip(skip)) {
            *slot = sample_to_byte(*sample);
        }
    }

    /// Peak absolute amplitude over the analysis window
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |max, s| max.max(s.abs()))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_encoding() {
        assert_eq!(sample_to_byte(0.0), 128);
        assert_eq!(sample_to_byte(-1.0), 0);
        assert_eq!(sample_to_byte(1.0), 255);
        assert_eq!(sample_to_byte(0.5), 192);
    }

    #[test]
    fn test_empty_analyzer_yields_flat_full_frame() {
        let analyzer = Analyzer::new();
        let frame = analyzer.frame();
        assert_eq!(frame.len(), FRAME_SIZE);
        assert!(frame.iter().all(|b| *b == SILENCE_BYTE));
        assert_eq!(analyzer.peak(), 0.0);
    }

    #[test]
    fn test_frame_holds_latest_samples_in_order() {
        let mut analyzer = Analyzer::new();
        for _ in 0..FFT_SIZE {
            analyzer.push(-1.0);
        }
        analyzer.push(0.5);
        analyzer.push(1.0);

        let frame = analyzer.frame();
        assert_eq!(frame.len(), FRAME_SIZE);
        assert_eq!(frame[FRAME_SIZE - 2], 192);
        assert_eq!(frame[FRAME_SIZE - 1], 255);
        assert_eq!(frame[0], 0);
    }

    #[test]
    fn test_partial_history_is_padded_with_silence() {
        let mut analyzer = Analyzer::new();
        analyzer.push(1.0);
        let frame = analyzer.frame();
        assert_eq!(frame[FRAME_SIZE - 1], 255);
        assert_eq!(frame[FRAME_SIZE - 2], SILENCE_BYTE);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut analyzer = Analyzer::new();
        for _ in 0..FFT_SIZE * 3 {
            analyzer.push(0.25);
        }
        assert_eq!(analyzer.samples.len(), FFT_SIZE);
        assert_eq!(analyzer.peak(), 0.25);
    }
}
