//! A minimal Standard MIDI File writer for building `.mid` fixtures.
//!
//! Events are declared at absolute ticks and serialized with running
//! delta times at `finish`, so fixtures read like charts rather than like
//! byte streams.

/// Builds one MTrk chunk.
pub struct TrackBuilder {
    /// `(tick, order_class, payload)`; class keeps note-offs ahead of
    /// note-ons sharing a tick.
    events: Vec<(u32, u8, Vec<u8>)>,
}

impl TrackBuilder {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Names the track with a meta-event at tick 0.
    pub fn name(mut self, name: &str) -> Self {
        let mut payload = vec![0xFF, 0x03];
        push_vlq(&mut payload, name.len() as u32);
        payload.extend_from_slice(name.as_bytes());
        self.events.push((0, 1, payload));
        self
    }

    pub fn tempo(&mut self, tick: u32, us_per_beat: u32) -> &mut Self {
        let bytes = us_per_beat.to_be_bytes();
        self.events
            .push((tick, 1, vec![0xFF, 0x51, 0x03, bytes[1], bytes[2], bytes[3]]));
        self
    }

    pub fn time_signature(&mut self, tick: u32, numerator: u8, denom_power: u8) -> &mut Self {
        self.events
            .push((tick, 1, vec![0xFF, 0x58, 0x04, numerator, denom_power, 24, 8]));
        self
    }

    pub fn text(&mut self, tick: u32, text: &str) -> &mut Self {
        let mut payload = vec![0xFF, 0x01];
        push_vlq(&mut payload, text.len() as u32);
        payload.extend_from_slice(text.as_bytes());
        self.events.push((tick, 1, payload));
        self
    }

    /// A note-on/note-off pair on channel 0 with velocity 100.
    pub fn note(&mut self, tick: u32, length: u32, pitch: u8) -> &mut Self {
        self.note_full(tick, length, pitch, 100, 0)
    }

    pub fn note_full(
        &mut self,
        tick: u32,
        length: u32,
        pitch: u8,
        velocity: u8,
        channel: u8,
    ) -> &mut Self {
        self.events
            .push((tick, 2, vec![0x90 | channel, pitch, velocity]));
        // A zero-length note's off must land after its own on; an off that
        // closes an earlier note goes ahead of new note-ons on its tick.
        let off_class = if length == 0 { 3 } else { 0 };
        self.events
            .push((tick + length, off_class, vec![0x80 | channel, pitch, 0]));
        self
    }

    /// A Phase-Shift SysEx message `50 53 00 00 <diff> <code> <value>`.
    pub fn phase_shift(&mut self, tick: u32, difficulty: u8, code: u8, on: bool) -> &mut Self {
        let data = [0x50, 0x53, 0x00, 0x00, difficulty, code, u8::from(on), 0xF7];
        let mut payload = vec![0xF0];
        push_vlq(&mut payload, data.len() as u32);
        payload.extend_from_slice(&data);
        self.events.push((tick, 1, payload));
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.events.sort_by_key(|&(tick, class, _)| (tick, class));
        let mut body = Vec::new();
        let mut last_tick = 0u32;
        for (tick, _, payload) in &self.events {
            push_vlq(&mut body, tick - last_tick);
            body.extend_from_slice(payload);
            last_tick = *tick;
        }
        // End of track.
        push_vlq(&mut body, 0);
        body.extend_from_slice(&[0xFF, 0x2F, 0x00]);

        let mut chunk = Vec::with_capacity(body.len() + 8);
        chunk.extend_from_slice(b"MTrk");
        chunk.extend_from_slice(&(body.len() as u32).to_be_bytes());
        chunk.extend_from_slice(&body);
        chunk
    }
}

/// Assembles a format-1 SMF with the given division and tracks.
pub fn smf(division: u16, tracks: Vec<Vec<u8>>) -> Vec<u8> {
    smf_with_format(1, division, tracks)
}

pub fn smf_with_format(format: u16, division: u16, tracks: Vec<Vec<u8>>) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    for track in tracks {
        bytes.extend_from_slice(&track);
    }
    bytes
}

/// A bare tempo track: 120 BPM, 4/4.
pub fn default_tempo_track() -> Vec<u8> {
    let mut track = TrackBuilder::new();
    track.tempo(0, 500_000).time_signature(0, 4, 2);
    track.finish()
}

fn push_vlq(out: &mut Vec<u8>, mut value: u32) {
    let mut stack = [0u8; 4];
    let mut count = 0;
    loop {
        stack[count] = (value & 0x7F) as u8;
        value >>= 7;
        count += 1;
        if value == 0 {
            break;
        }
    }
    for index in (0..count).rev() {
        let byte = stack[index] | if index > 0 { 0x80 } else { 0 };
        out.push(byte);
    }
}

#[test]
fn vlq_encoding() {
    let mut out = Vec::new();
    push_vlq(&mut out, 0);
    push_vlq(&mut out, 0x7F);
    push_vlq(&mut out, 0x80);
    push_vlq(&mut out, 0x3FFF);
    push_vlq(&mut out, 0x4000);
    assert_eq!(
        out,
        vec![0x00, 0x7F, 0x81, 0x00, 0xFF, 0x7F, 0x81, 0x80, 0x00]
    );
}
