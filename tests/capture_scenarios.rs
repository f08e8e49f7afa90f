use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use rdx::{
    CaptureError, CapturePlan, CaptureRequest, CapturedSequence, EncodeError, FrameEncoder,
    GifFrameEncoder, Playback, Session, SimParams,
};
use std::io::Cursor;

fn spots() -> SimParams {
    SimParams {
        du: 0.16,
        dv: 0.08,
        feed: 0.029,
        kill: 0.057,
        dt: 1.0,
        steps_per_frame: 4,
    }
}

/// Keeps the sequence it was given instead of encoding it.
#[derive(Default)]
struct Keep {
    seen: Option<CapturedSequence>,
}

impl FrameEncoder for Keep {
    fn encode(&mut self, seq: &CapturedSequence) -> Result<Vec<u8>, EncodeError> {
        self.seen = Some(seq.clone());
        Ok(b"ok".to_vec())
    }
}

#[test]
fn two_seconds_at_ten_fps() {
    let mut s = Session::with_grid(64, spots(), "rdx").unwrap();
    let mut keep = Keep::default();
    let req = CaptureRequest {
        seconds: 2.0,
        fps: 10.0,
        scale: 1.0,
    };
    assert_eq!(s.capture(&req, &mut keep).unwrap(), b"ok");

    let seq = keep.seen.unwrap();
    assert_eq!(seq.frames.len(), 20);
    assert_eq!(seq.delay_ms, 100);
    for f in &seq.frames {
        assert_eq!(f.side(), 64);
        assert_eq!(f.as_bytes().len(), 64 * 64 * 4);
    }
}

#[test]
fn one_second_at_three_fps() {
    let plan = CapturePlan::new(
        &CaptureRequest {
            seconds: 1.0,
            fps: 3.0,
            scale: 1.0,
        },
        64,
    )
    .unwrap();
    assert_eq!(plan.frames, 3);
    assert_eq!(plan.delay_ms, 333);
}

#[test]
fn scaled_capture_upsamples() {
    let mut s = Session::with_grid(32, spots(), "scale").unwrap();
    let mut keep = Keep::default();
    let req = CaptureRequest {
        seconds: 0.5,
        fps: 4.0,
        scale: 2.0,
    };
    s.capture(&req, &mut keep).unwrap();
    let seq = keep.seen.unwrap();
    assert_eq!(seq.frames.len(), 2);
    assert_eq!(seq.side(), 64);

    let last = seq.frames.last().unwrap();
    let native = s.pixels();
    for y in 0..64 {
        for x in 0..64 {
            assert_eq!(last.pixel(x, y), native.pixel(x / 2, y / 2));
        }
    }
}

#[test]
fn gif_round_trip_has_every_frame() {
    let mut s = Session::with_grid(64, spots(), "rdx").unwrap();
    let req = CaptureRequest {
        seconds: 2.0,
        fps: 10.0,
        scale: 1.0,
    };
    let blob = s.capture(&req, &mut GifFrameEncoder::default()).unwrap();

    let decoder = GifDecoder::new(Cursor::new(blob)).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 20);
    for f in &frames {
        assert_eq!(f.buffer().dimensions(), (64, 64));
        let (num, den) = f.delay().numer_denom_ms();
        assert_eq!(num / den, 100);
    }
}

#[test]
fn capture_before_seed_is_a_precondition_error() {
    let mut s = Session::new(spots(), "rdx");
    let err = s
        .capture(&CaptureRequest::default(), &mut GifFrameEncoder::default())
        .unwrap_err();
    assert!(matches!(err, CaptureError::NotInitialized));
}

#[test]
fn failed_encode_restores_running_playback() {
    let mut s = Session::with_grid(16, spots(), "rdx").unwrap();
    assert_eq!(s.playback(), Playback::Running);
    let mut broken = |_: &CapturedSequence| -> Result<Vec<u8>, EncodeError> {
        Err(EncodeError::Other("encoder unavailable".into()))
    };
    let err = s
        .capture(
            &CaptureRequest {
                seconds: 1.0,
                fps: 5.0,
                scale: 1.0,
            },
            &mut broken,
        )
        .unwrap_err();
    assert!(matches!(err, CaptureError::Encode(_)));
    assert_eq!(s.playback(), Playback::Running);
    assert!(s.tick());
}

#[test]
fn params_handle_drives_later_captures() {
    let mut a = Session::with_grid(24, spots(), "live").unwrap();
    let mut b = Session::with_grid(24, spots(), "live").unwrap();
    let handle = a.params_handle();
    let one = CaptureRequest {
        seconds: 1.0,
        fps: 1.0,
        scale: 1.0,
    };

    a.capture(&one, &mut Keep::default()).unwrap();
    handle.update(|p| p.feed = 0.04);
    a.capture(&one, &mut Keep::default()).unwrap();

    b.capture(&one, &mut Keep::default()).unwrap();
    b.set_feed(0.04);
    b.capture(&one, &mut Keep::default()).unwrap();

    assert_eq!(a.grid().unwrap().v(), b.grid().unwrap().v());
    assert_eq!(a.params().feed, 0.04);
}
