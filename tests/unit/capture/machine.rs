use super::*;

fn src(tag: u8) -> ImageSource {
    ImageSource::new("image/png", vec![tag])
}

fn idx(i: usize) -> SlotIndex {
    SlotIndex::new(i).unwrap()
}

fn payload(m: &CaptureStateMachine, i: usize) -> Option<u8> {
    m.slots().get(idx(i)).source().map(|s| s.bytes()[0])
}

#[test]
fn uploads_fill_lowest_empty_slot_in_order() {
    let mut m = CaptureStateMachine::new();
    for tag in [b'A', b'B', b'C'] {
        let out = m.fill(None, src(tag), AcquisitionPath::Upload).unwrap();
        assert_eq!(out.signal, None);
    }
    assert!(m.is_complete());
    assert_eq!(payload(&m, 0), Some(b'A'));
    assert_eq!(payload(&m, 1), Some(b'B'));
    assert_eq!(payload(&m, 2), Some(b'C'));
    assert_eq!(m.current_target(), None);
}

#[test]
fn upload_into_full_set_is_refused_and_leaves_slots_alone() {
    let mut m = CaptureStateMachine::new();
    for tag in [1, 2, 3] {
        m.fill(None, src(tag), AcquisitionPath::Upload).unwrap();
    }
    let rev = m.slots().revision();
    let err = m.fill(None, src(9), AcquisitionPath::Upload).unwrap_err();
    assert!(matches!(err, PhotocardError::SlotsFull));
    assert_eq!(m.slots().revision(), rev);
    assert_eq!(payload(&m, 0), Some(1));
}

#[test]
fn camera_auto_advances_and_stops_when_complete() {
    let mut m = CaptureStateMachine::new();
    assert_eq!(m.start_acquisition(), Some(DeviceSignal::Start));
    assert_eq!(m.current_target(), Some(idx(0)));

    let out = m.fill(None, src(1), AcquisitionPath::Camera).unwrap();
    assert_eq!(out.slot, Some(idx(0)));
    assert_eq!(out.signal, None);
    assert_eq!(m.current_target(), Some(idx(1)));

    m.fill(None, src(2), AcquisitionPath::Camera).unwrap();
    assert_eq!(m.current_target(), Some(idx(2)));

    let out = m.fill(None, src(3), AcquisitionPath::Camera).unwrap();
    assert_eq!(out.slot, Some(idx(2)));
    assert_eq!(out.signal, Some(DeviceSignal::Stop));
    assert_eq!(m.device_state(), DeviceState::Idle);
    assert_eq!(m.current_target(), None);
}

#[test]
fn camera_frame_on_full_set_is_dropped_with_stop() {
    let mut m = CaptureStateMachine::new();
    for tag in [1, 2, 3] {
        m.fill(None, src(tag), AcquisitionPath::Upload).unwrap();
    }
    let rev = m.slots().revision();
    let out = m.fill(None, src(9), AcquisitionPath::Camera).unwrap();
    assert_eq!(out.slot, None);
    assert_eq!(out.signal, Some(DeviceSignal::Stop));
    assert_eq!(m.slots().revision(), rev);
}

#[test]
fn retake_targets_cleared_slot_and_restarts_device() {
    let mut m = CaptureStateMachine::new();
    for tag in [1, 2, 3] {
        m.fill(None, src(tag), AcquisitionPath::Upload).unwrap();
    }
    assert_eq!(m.clear(idx(1)), Some(DeviceSignal::Start));
    assert!(!m.is_complete());
    assert_eq!(m.current_target(), Some(idx(1)));
    assert_eq!(payload(&m, 0), Some(1));
    assert_eq!(payload(&m, 2), Some(3));

    let out = m.fill(None, src(7), AcquisitionPath::Camera).unwrap();
    assert_eq!(out.slot, Some(idx(1)));
    assert_eq!(out.signal, Some(DeviceSignal::Stop));
    assert!(m.is_complete());
}

#[test]
fn clearing_while_acquiring_does_not_signal_again() {
    let mut m = CaptureStateMachine::new();
    m.fill(None, src(1), AcquisitionPath::Upload).unwrap();
    m.fill(None, src(2), AcquisitionPath::Upload).unwrap();
    assert_eq!(m.start_acquisition(), Some(DeviceSignal::Start));
    assert_eq!(m.current_target(), Some(idx(2)));
    assert_eq!(m.clear(idx(0)), None);
    assert_eq!(m.current_target(), Some(idx(0)));
}

#[test]
fn explicit_upload_index_overwrites_that_slot() {
    let mut m = CaptureStateMachine::new();
    m.fill(None, src(1), AcquisitionPath::Upload).unwrap();
    let out = m
        .fill(Some(idx(0)), src(5), AcquisitionPath::Upload)
        .unwrap();
    assert_eq!(out.slot, Some(idx(0)));
    assert_eq!(payload(&m, 0), Some(5));
    assert_eq!(m.slots().filled_count(), 1);
}

#[test]
fn start_on_complete_set_is_a_no_op() {
    let mut m = CaptureStateMachine::new();
    for tag in [1, 2, 3] {
        m.fill(None, src(tag), AcquisitionPath::Upload).unwrap();
    }
    assert_eq!(m.start_acquisition(), None);
    assert_eq!(m.device_state(), DeviceState::Idle);
}

#[test]
fn reset_empties_slots_and_stops_device() {
    let mut m = CaptureStateMachine::new();
    m.start_acquisition();
    m.fill(None, src(1), AcquisitionPath::Camera).unwrap();
    let rev = m.slots().revision();
    assert_eq!(m.reset(), Some(DeviceSignal::Stop));
    assert!(m.slots().is_empty());
    assert!(m.slots().revision() > rev);
    assert_eq!(m.current_target(), Some(idx(0)));
    assert_eq!(m.reset(), None);
}

#[test]
fn acquisition_failure_returns_to_idle() {
    let mut m = CaptureStateMachine::new();
    m.start_acquisition();
    m.acquisition_failed();
    assert_eq!(m.device_state(), DeviceState::Idle);
    assert_eq!(m.start_acquisition(), Some(DeviceSignal::Start));
}

#[test]
fn every_mutation_bumps_revision() {
    let mut m = CaptureStateMachine::new();
    let r0 = m.slots().revision();
    m.fill(None, src(1), AcquisitionPath::Upload).unwrap();
    let r1 = m.slots().revision();
    m.clear(idx(0));
    let r2 = m.slots().revision();
    assert!(r0 < r1 && r1 < r2);
}

#[test]
fn camera_frame_while_idle_is_dropped_without_state_change() {
    let mut m = CaptureStateMachine::new();
    m.fill(None, src(1), AcquisitionPath::Upload).unwrap();
    let rev = m.slots().revision();

    let out = m.fill(None, src(2), AcquisitionPath::Camera).unwrap();
    assert_eq!(out, FillOutcome { slot: None, signal: None });
    assert_eq!(m.device_state(), DeviceState::Idle);
    assert_eq!(m.slots().revision(), rev);
    assert_eq!(m.start_acquisition(), Some(DeviceSignal::Start));
}

#[test]
fn upload_completing_the_set_while_acquiring_reports_stop() {
    let mut m = CaptureStateMachine::new();
    m.start_acquisition();
    m.fill(None, src(1), AcquisitionPath::Camera).unwrap();
    m.fill(None, src(2), AcquisitionPath::Camera).unwrap();

    let out = m.fill(None, src(3), AcquisitionPath::Upload).unwrap();
    assert_eq!(out.slot, Some(idx(2)));
    assert_eq!(out.signal, Some(DeviceSignal::Stop));
    assert_eq!(m.device_state(), DeviceState::Idle);
}
