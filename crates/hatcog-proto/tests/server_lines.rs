//! Parsing of lines captured from real servers.
//!
//! Each case checks the fields the daemon routes on: command, user and
//! the resolved channel.

use hatcog_proto::command::{ERR_UNKNOWNCOMMAND, RPL_AWAY, RPL_NAMREPLY, RPL_TOPIC};
use hatcog_proto::{parse, MalformedKind, ParseError};

struct Case {
    raw: &'static str,
    command: &'static str,
    user: &'static str,
    channel: &'static str,
}

const CASES: &[Case] = &[
    Case {
        raw: ":graham!~graham@example.net PRIVMSG #go-nuts :anyone around?\r\n",
        command: "PRIVMSG",
        user: "graham",
        channel: "#go-nuts",
    },
    Case {
        raw: ":graham!~graham@example.net PRIVMSG hatcog :hey, private\r\n",
        command: "PRIVMSG",
        user: "graham",
        channel: "graham",
    },
    Case {
        raw: ":graham!~graham@example.net JOIN :#go-nuts\r\n",
        command: "JOIN",
        user: "graham",
        channel: "#go-nuts",
    },
    Case {
        raw: ":graham!~graham@example.net JOIN #go-nuts\r\n",
        command: "JOIN",
        user: "graham",
        channel: "#go-nuts",
    },
    Case {
        raw: ":graham!~graham@example.net PART #go-nuts :Leaving\r\n",
        command: "PART",
        user: "graham",
        channel: "#go-nuts",
    },
    Case {
        raw: ":graham!~graham@example.net QUIT :Ping timeout: 240 seconds\r\n",
        command: "QUIT",
        user: "graham",
        channel: "",
    },
    Case {
        raw: ":graham!~graham@example.net NICK :graham_\r\n",
        command: "NICK",
        user: "graham",
        channel: "",
    },
    Case {
        raw: ":irc.example.net 332 hatcog #go-nuts :Go programming | pastebin only\r\n",
        command: RPL_TOPIC,
        user: "",
        channel: "#go-nuts",
    },
    Case {
        raw: ":irc.example.net 353 hatcog = #go-nuts :hatcog @graham +alice\r\n",
        command: RPL_NAMREPLY,
        user: "",
        channel: "#go-nuts",
    },
    Case {
        raw: ":irc.example.net 421 hatcog FOO :Unknown command\r\n",
        command: ERR_UNKNOWNCOMMAND,
        user: "",
        channel: "",
    },
    Case {
        raw: ":irc.example.net 301 hatcog alice :Gone to lunch\r\n",
        command: RPL_AWAY,
        user: "alice",
        channel: "alice",
    },
    Case {
        raw: ":alice!~a@example.org PRIVMSG #go-nuts :\x01ACTION rolls her eyes\x01\r\n",
        command: "ACTION",
        user: "alice",
        channel: "#go-nuts",
    },
    Case {
        raw: ":alice!~a@example.org PRIVMSG hatcog :\x01VERSION\x01\r\n",
        command: "VERSION",
        user: "alice",
        channel: "alice",
    },
    Case {
        raw: "NOTICE AUTH :*** Looking up your hostname...\r\n",
        command: "NOTICE",
        user: "",
        channel: "",
    },
];

#[test]
fn test_server_lines() {
    for case in CASES {
        let msg = parse(case.raw).unwrap_or_else(|e| panic!("{:?}: {e}", case.raw));
        assert_eq!(msg.command, case.command, "command of {:?}", case.raw);
        assert_eq!(msg.user, case.user, "user of {:?}", case.raw);
        assert_eq!(msg.channel, case.channel, "channel of {:?}", case.raw);
    }
}

#[test]
fn test_topic_reply_keeps_args_and_content() {
    let msg = parse(CASES[7].raw).unwrap();
    assert_eq!(msg.args, vec!["hatcog", "#go-nuts"]);
    assert_eq!(msg.content, "Go programming | pastebin only");
}

#[test]
fn test_unknown_command_reply_args() {
    let msg = parse(CASES[9].raw).unwrap();
    assert_eq!(msg.args, vec!["hatcog", "FOO"]);
}

#[test]
fn test_action_example() {
    let msg = parse(":alice!a@h PRIVMSG #x :ACTION waves").unwrap();
    assert_eq!(msg.command, "ACTION");
    assert_eq!(msg.content, "waves");
    assert!(!msg.is_ctcp);
}

#[test]
fn test_rejected_lines() {
    assert_eq!(parse("\r\n"), Err(ParseError::TooShort));
    assert_eq!(parse("OK"), Err(ParseError::TooShort));
    assert_eq!(
        parse(":irc.example.net"),
        Err(ParseError::Malformed(MalformedKind::PrefixWithoutCommand))
    );
    assert_eq!(
        parse(":a!b!c NOTICE x :y"),
        Err(ParseError::Malformed(MalformedKind::AmbiguousPrefix))
    );
}
