//! Signal multiplication primitive.

/*
Voltage-Controlled Amplification
================================

A VCA multiplies the audio by a static gain and by a control signal, sample
by sample:

    output[i] = input[i] × gain × control[i]

The control signal is usually an envelope (0.0 to 1.0), which is how a
steady oscillator becomes a note with a beginning and an end.

    Oscillator: [ 0.8, -0.6,  0.9, -0.7, ...]
    Envelope:   [ 0.2,  0.5,  0.8,  1.0, ...]
    Output:     [0.16, -0.3, 0.72, -0.7, ...]   (gain = 1.0)


Missing Control
---------------

When no control block is available the control value is 0.0, not 1.0. A VCA
with nothing patched into its CV input is closed: the output is silence.
*/

/// `out[i] = signal[i] × gain × control[i]`, or all zeros when there is no
/// control block.
#[inline]
pub fn gain_modulate(signal: &[f32], gain: f32, control: Option<&[f32]>, out: &mut [f32]) {
    debug_assert_eq!(signal.len(), out.len());

    match control {
        Some(control) => {
            debug_assert_eq!(signal.len(), control.len());
            for ((o, &s), &c) in out.iter_mut().zip(signal).zip(control) {
                *o = s * gain * c;
            }
        }
        None => out.fill(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplies_by_gain_and_control() {
        let signal = [1.0, 0.5, -0.5, -1.0];
        let control = [1.0, 0.5, 0.5, 0.0];
        let mut out = [9.0; 4];

        gain_modulate(&signal, 2.0, Some(&control), &mut out);

        assert_eq!(out, [2.0, 0.5, -0.5, 0.0]);
    }

    #[test]
    fn missing_control_silences() {
        let signal = [0.3, -0.7, 0.5];
        let mut out = [1.0; 3];

        gain_modulate(&signal, 1.0, None, &mut out);

        assert_eq!(out, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn unity_gain_and_control_unchanged() {
        let signal = [0.3, -0.7, 0.5];
        let control = [1.0, 1.0, 1.0];
        let mut out = [0.0; 3];

        gain_modulate(&signal, 1.0, Some(&control), &mut out);

        assert_eq!(out, signal);
    }
}
