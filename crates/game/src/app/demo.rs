use std::time::Duration;

use engine::{Frame, KeyCode, KeyEvent};

use super::config::DemoSettings;

/// Headless stand-in for a human at the keyboard: walk right toward the bat, stop,
/// swing until it drops, then hop.
const DEMO_SCRIPT: [(u32, KeyEvent); 8] = [
    (0, KeyEvent::pressed(KeyCode::D)),
    (150, KeyEvent::released(KeyCode::D)),
    (200, KeyEvent::pressed(KeyCode::Space)),
    (500, KeyEvent::released(KeyCode::Space)),
    (520, KeyEvent::pressed(KeyCode::ArrowUp)),
    (524, KeyEvent::released(KeyCode::ArrowUp)),
    (560, KeyEvent::pressed(KeyCode::A)),
    (590, KeyEvent::released(KeyCode::A)),
];

pub(crate) fn scripted_frames(settings: &DemoSettings) -> Vec<Frame> {
    let real_dt = Duration::from_millis(settings.frame_ms);
    (0..settings.frames)
        .map(|index| Frame {
            real_dt,
            key_events: DEMO_SCRIPT
                .iter()
                .filter(|(frame, _)| *frame == index)
                .map(|(_, event)| *event)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_events_land_on_their_frames() {
        let frames = scripted_frames(&DemoSettings {
            frames: 201,
            frame_ms: 10,
        });

        assert_eq!(frames.len(), 201);
        assert_eq!(frames[0].key_events, vec![KeyEvent::pressed(KeyCode::D)]);
        assert!(frames[1].key_events.is_empty());
        assert_eq!(
            frames[200].key_events,
            vec![KeyEvent::pressed(KeyCode::Space)]
        );
        assert!(frames
            .iter()
            .all(|frame| frame.real_dt == Duration::from_millis(10)));
    }

    #[test]
    fn short_demo_drops_late_events() {
        let frames = scripted_frames(&DemoSettings {
            frames: 3,
            frame_ms: 16,
        });
        let events: usize = frames.iter().map(|frame| frame.key_events.len()).sum();
        assert_eq!(events, 1);
    }
}
