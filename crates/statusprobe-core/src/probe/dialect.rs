//! Byte layouts of the GPS tracker login/heartbeat exchanges
//!
//! Handshake probes are configured with raw byte pairs, so any dialect can be
//! expressed in configuration. These helpers build the pairs for the two
//! tracker families the ingestion servers speak, for tests and for generating
//! configuration.

/// A request and the exact response the server must answer with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub send: Vec<u8>,
    pub expect: Vec<u8>,
}

/// Queclink `GTHBD` heartbeat, delimited ASCII terminated by `$`
///
/// The device sends
/// `+ACK:GTHBD,<protocol>,<imei>,<device name>,<send time>,<count>$`
/// and the server acknowledges with `+SACK:GTHBD,<protocol>,<count>$`.
/// The device name field is left empty.
pub fn queclink_heartbeat(protocol: &str, imei: &str, send_time: &str, count: &str) -> Exchange {
    Exchange {
        send: format!("+ACK:GTHBD,{protocol},{imei},,{send_time},{count}$").into_bytes(),
        expect: format!("+SACK:GTHBD,{protocol},{count}$").into_bytes(),
    }
}

/// Teltonika IMEI login: big-endian u16 length, then the IMEI in ASCII
///
/// The server accepts the device with a single `0x01` byte. Returns `None`
/// when the IMEI does not fit the 16-bit length prefix.
pub fn teltonika_imei_login(imei: &str) -> Option<Exchange> {
    let imei = imei.as_bytes();
    let len = u16::try_from(imei.len()).ok()?;

    let mut send = Vec::with_capacity(imei.len() + 2);
    send.extend_from_slice(&len.to_be_bytes());
    send.extend_from_slice(imei);

    Some(Exchange {
        send,
        expect: vec![0x01],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queclink_heartbeat_layout() {
        let exchange = queclink_heartbeat("C30203", "860201061588748", "20230202181922", "FFFF");
        assert_eq!(
            exchange.send,
            b"+ACK:GTHBD,C30203,860201061588748,,20230202181922,FFFF$".to_vec()
        );
        assert_eq!(exchange.expect, b"+SACK:GTHBD,C30203,FFFF$".to_vec());
    }

    #[test]
    fn test_teltonika_login_is_length_prefixed() {
        let exchange = teltonika_imei_login("356307042441013").unwrap();
        assert_eq!(
            exchange.send,
            hex::decode("000f333536333037303432343431303133").unwrap()
        );
        assert_eq!(exchange.expect, vec![0x01]);
    }

    #[test]
    fn test_teltonika_login_prefix_limit() {
        let longest = "9".repeat(usize::from(u16::MAX));
        let exchange = teltonika_imei_login(&longest).unwrap();
        assert_eq!(&exchange.send[..2], &[0xff, 0xff]);
        assert_eq!(exchange.send.len(), longest.len() + 2);

        assert!(teltonika_imei_login(&"9".repeat(usize::from(u16::MAX) + 1)).is_none());
    }
}
