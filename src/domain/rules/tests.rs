// Unit tests for business rules

use super::*;

fn range(start: f64, end: f64, duration: f64) -> TimeRange {
    TimeRange {
        start,
        end,
        duration,
    }
}

#[test]
fn test_trim_policy_full_range_is_not_a_trim() {
    assert!(!TrimPolicy::requests_trim(&TimeRange::full(10.0)));
    assert_eq!(TrimPolicy::clip_window(&TimeRange::full(10.0)), None);
}

#[test]
fn test_trim_policy_degenerate_ranges() {
    assert!(!TrimPolicy::requests_trim(&range(4.0, 4.0, 10.0)));
    assert!(!TrimPolicy::requests_trim(&range(5.0, 4.0, 10.0)));
    assert!(!TrimPolicy::requests_trim(&TimeRange::full(0.0)));
}

#[test]
fn test_trim_policy_treats_near_full_window_as_whole_clip() {
    assert_eq!(TrimPolicy::clip_window(&range(1e-9, 10.0 - 1e-9, 10.0)), None);
}

#[test]
fn test_trim_policy_partial_windows() {
    assert_eq!(TrimPolicy::clip_window(&range(0.0, 4.0, 10.0)), Some((0.0, 4.0)));
    assert_eq!(TrimPolicy::clip_window(&range(2.5, 10.0, 10.0)), Some((2.5, 10.0)));
    assert_eq!(TrimPolicy::clip_window(&range(1.0, 2.0, 10.0)), Some((1.0, 2.0)));
}

#[test]
fn test_staged_names() {
    let settings = OutputSettings::default();
    let source = MediaSource::new("clip.MOV", "video/quicktime", vec![1]);
    let names = StagedNames::for_source(&source, &settings);
    assert_eq!(names.input, "input.mov");
    assert_eq!(names.output, "output.gif");

    let bare = MediaSource::new("clip", "video/mp4", vec![1]);
    assert_eq!(StagedNames::for_source(&bare, &settings).input, "input");
}

#[test]
fn test_output_file_name() {
    assert_eq!(output_file_name("holiday.mp4", "gif"), "holiday.gif");
    assert_eq!(output_file_name("my.trip.webm", "gif"), "my.trip.gif");
    assert_eq!(output_file_name("noext", "gif"), "noext.gif");
    assert_eq!(output_file_name("/home/u/videos/a.mkv", "gif"), "a.gif");
    assert_eq!(output_file_name("", "gif"), "output.gif");
    assert_eq!(output_file_name(".mp4", "gif"), "output.gif");
}

#[test]
fn test_format_clip_time() {
    assert_eq!(format_clip_time(4.0), "4.000");
    assert_eq!(format_clip_time(1.23456), "1.235");
    assert_eq!(format_clip_time(-0.5), "0.000");
}

#[test]
fn test_clamp_progress() {
    assert_eq!(clamp_progress(0.5), Some(0.5));
    assert_eq!(clamp_progress(-0.2), Some(0.0));
    assert_eq!(clamp_progress(3.0), Some(1.0));
    assert_eq!(clamp_progress(f64::NAN), None);
    assert_eq!(clamp_progress(f64::INFINITY), None);
}

#[test]
fn test_validate_conversion_input() {
    let empty = MediaSource::new("a.mp4", "video/mp4", Vec::new());
    assert!(matches!(
        validate_conversion_input(&empty, &TimeRange::full(5.0)),
        Err(DomainError::InputConstraintViolation(_))
    ));

    let source = MediaSource::new("a.mp4", "video/mp4", vec![1]);
    assert!(validate_conversion_input(&source, &TimeRange::full(5.0)).is_ok());
    assert!(validate_conversion_input(&source, &range(-1.0, 2.0, 5.0)).is_err());
}

#[test]
fn test_transcode_command_with_trim() {
    let names = StagedNames {
        input: "input.mp4".to_string(),
        output: "output.gif".to_string(),
    };
    let command = TranscodeCommand::build(&names, &range(0.0, 4.0, 10.0), &OutputSettings::default());
    assert_eq!(
        command.to_argv(),
        vec![
            "-i",
            "input.mp4",
            "-ss",
            "0.000",
            "-to",
            "4.000",
            "-vf",
            "fps=15,scale=320:-1",
            "output.gif"
        ]
    );
}

#[test]
fn test_transcode_command_whole_clip() {
    let names = StagedNames {
        input: "input.mp4".to_string(),
        output: "output.gif".to_string(),
    };
    let command = TranscodeCommand::build(&names, &TimeRange::full(10.0), &OutputSettings::default());
    assert_eq!(
        command.to_argv(),
        vec!["-i", "input.mp4", "-vf", "fps=15,scale=320:-1", "output.gif"]
    );
}

#[test]
fn test_transcode_command_custom_settings() {
    let names = StagedNames {
        input: "input.webm".to_string(),
        output: "output.gif".to_string(),
    };
    let settings = OutputSettings {
        fps: 10,
        width: 480,
        ..OutputSettings::default()
    };
    let command = TranscodeCommand::build(&names, &TimeRange::full(3.0), &settings);
    assert_eq!(command.video_filter, "fps=10,scale=480:-1");
}
