// Copyright 2017 Thomas de Zeeuw
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT
// or http://opensource.org/licenses/MIT>, at your option. This file may not be
// used, copied, modified, or distributed except according to those terms.

use std::env;

use super::*;

#[test]
fn should_get_the_options_from_env() {
    let vars = [
        ("REQUEST_LOG_PREFIX", "my_app"),
        ("REQUEST_LOG_NO_BRACKETS", "1"),
        ("REQUEST_LOG_ADDRESS_HEADERS", "X-Real-IP, X-Forwarded-For,"),
        ("REQUEST_LOG_IGNORE", "/favicon.ico,/health"),
        ("REQUEST_LOG_FLAGS", "16"),
    ];
    for (name, value) in vars {
        env::set_var(name, value);
    }

    let options = Options::from_env();
    assert_eq!(options.prefix, "my_app");
    assert!(options.disable_auto_brackets);
    assert_eq!(options.remote_address_headers, vec!["X-Real-IP", "X-Forwarded-For"]);
    assert_eq!(options.ignored_request_uris, vec!["/favicon.ico", "/health"]);
    assert_eq!(options.output_flags, OutputFlags::Custom(Flags::SHORT_FILE));
    assert!(options.out.is_none());

    // Empty and invalid values are ignored.
    env::set_var("REQUEST_LOG_PREFIX", "");
    env::set_var("REQUEST_LOG_FLAGS", "date");
    let options = Options::from_env();
    assert_eq!(options.prefix, "");
    assert_eq!(options.output_flags, OutputFlags::Standard);

    for (name, _) in vars {
        env::remove_var(name);
    }

    let options = Options::from_env();
    assert!(!options.disable_auto_brackets);
    assert!(options.remote_address_headers.is_empty());
    assert!(options.ignored_request_uris.is_empty());
}

#[test]
fn effective_prefix() {
    let tests = [
        ("", false, ""),
        ("", true, ""),
        ("app", false, "[app] "),
        ("app: ", true, "app: "),
    ];

    for (prefix, disable_auto_brackets, want) in tests {
        let options = Options {
            prefix: prefix.to_owned(),
            disable_auto_brackets,
            ..Options::default()
        };
        assert_eq!(options.effective_prefix(), want);
    }
}

#[test]
fn output_flags_from_int() {
    let tests = [
        (-1, OutputFlags::Disabled, Flags::NONE),
        (0, OutputFlags::Standard, Flags::STD),
        (16, OutputFlags::Custom(Flags::SHORT_FILE), Flags::SHORT_FILE),
        (
            1 | 2 | 4,
            OutputFlags::Custom(Flags::STD | Flags::MICROSECONDS),
            Flags::STD | Flags::MICROSECONDS,
        ),
        // Only unknown bits, still used as given.
        (
            1 << 10,
            OutputFlags::Custom(Flags::from_bits_retain(1 << 10)),
            Flags::from_bits_retain(1 << 10),
        ),
        (128, OutputFlags::Custom(Flags::from_bits_retain(128)), Flags::from_bits_retain(128)),
    ];

    for (value, want, want_resolved) in tests {
        let got = OutputFlags::from(value);
        assert_eq!(got, want, "value: {value}");
        assert_eq!(got.resolve(), want_resolved, "value: {value}");
    }
}

#[test]
fn explicit_empty_flags_are_not_standard() {
    assert_eq!(OutputFlags::Custom(Flags::NONE).resolve(), Flags::NONE);
    assert_eq!(OutputFlags::from(Flags::NONE).resolve(), Flags::NONE);
}

#[test]
fn flags_debug() {
    assert_eq!(format!("{:?}", Flags::NONE), "NONE");
    assert_eq!(format!("{:?}", Flags::STD), "DATE | TIME");
    assert_eq!(format!("{:?}", Flags::SHORT_FILE | Flags::UTC), "SHORT_FILE | UTC");
    assert_eq!(format!("{:?}", Flags::from_bits_retain(1 | 128)), "DATE | 0x80");
}

#[test]
fn handlers_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    fn hello(w: &mut dyn ResponseWriter, _: &Request) {
        let _ = w.write(b"hello");
    }

    let logger = RequestLogger::with_options(Options {
        out: Some(Box::new(std::io::sink())),
        ..Options::default()
    });
    assert_send_sync(&logger);
    assert_send_sync(&logger.wrap(hello));
}
