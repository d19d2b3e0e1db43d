use remtrans_core::{Signal, import_reader};

#[test]
fn full_document_end_to_end() {
    let input = "\
[REMOTE]
[NAME]tv

[TIMING]
[1][N]2[1]480 420[2]480 4640[FREQ]38
[2][RC5][FREQ]36

[COMMANDS]
[digit1][][T]1[D]0101
[toggle][][T]2[D]100000000001
[blast][][RAW]4[FREQ]40[D]100 200 100 200
";
    let report = import_reader(input.as_bytes(), "inline.rem", Some("tester")).expect("import");
    assert!(report.stats.is_clean());
    assert_eq!(report.remote_set.creating_user.as_deref(), Some("tester"));

    let tv = report.remote_set.remote("tv").expect("remote tv");
    assert_eq!(tv.commands.len(), 3);

    assert_eq!(
        tv.command("digit1").unwrap().signal,
        Signal::Raw {
            frequency_hz: 38_000,
            durations: vec![480, 420, 480, 4640, 480, 420, 480, 4640],
        }
    );

    match &tv.command("toggle").unwrap().signal {
        Signal::Protocol {
            protocol,
            parameters,
        } => {
            assert_eq!(protocol, "RC5");
            assert_eq!(parameters["D"], 0);
            assert_eq!(parameters["F"], 65);
            assert_eq!(parameters["T"], 1);
        }
        other => panic!("expected protocol signal, got {other:?}"),
    }

    assert_eq!(
        tv.command("blast").unwrap().signal,
        Signal::Raw {
            frequency_hz: 40_000,
            durations: vec![100, 200, 100, 200],
        }
    );
}

#[test]
fn one_bad_line_between_two_good_ones() {
    let input = "\
[REMOTE]
[NAME]tv
[COMMANDS]
[first][][CCF]0000
[second][][RAW]nonsense
[third][][CCF]1111
";
    let report = import_reader(input.as_bytes(), "inline.rem", None).expect("import");
    let tv = report.remote_set.remote("tv").expect("remote tv");
    assert_eq!(tv.commands.len(), 2);
    assert!(tv.command("first").is_some());
    assert!(tv.command("third").is_some());
    assert_eq!(report.stats.commands_skipped, 1);
}
