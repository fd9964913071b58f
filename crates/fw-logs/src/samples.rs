//! Sample log files for tests and local development.

/// A Windows Defender Firewall `pfirewall.log` excerpt, header included.
pub fn windows_defender() -> Vec<String> {
    [
        "#Version: 1.5",
        "#Software: Microsoft Windows Firewall",
        "#Time Format: Local",
        "#Fields: date time action protocol src-ip dst-ip src-port dst-port size tcpflags tcpsyn tcpack tcpwin icmptype icmpcode info path",
        "",
        "2024-01-15 12:00:01 ALLOW TCP 192.168.1.10 142.250.74.110 51234 443 0 - 0 0 0 - - - SEND",
        "2024-01-15 12:00:02 ALLOW UDP 192.168.1.10 8.8.8.8 53211 53 0 - - - - - - - SEND",
        "2024-01-15 12:00:05 DROP TCP 203.0.113.7 192.168.1.10 44321 22 60 S 0 0 64240 - - - RECEIVE",
        "2024-01-15 12:00:06 DROP TCP 203.0.113.7 192.168.1.10 44322 23 60 S 0 0 64240 - - - RECEIVE",
        "2024-01-15 12:00:07 DROP TCP 203.0.113.7 192.168.1.10 44323 3389 60 S 0 0 64240 - - - RECEIVE",
        "2024-01-15 12:00:10 DROP ICMP 198.51.100.4 192.168.1.10 - - 84 - - - - 8 0 - RECEIVE",
        "2024-01-15 12:00:12 ALLOW TCP 192.168.1.10 140.82.112.3 51240 443 0 - 0 0 0 - - - SEND",
        "2024-01-15 12:00:15 DROP UDP 192.168.1.23 192.168.1.255 137 137 78 - - - - - - - RECEIVE",
        "2024-01-15 12:00:20 ALLOW 2 192.168.1.1 224.0.0.1 - - 36 - - - - - - - RECEIVE",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// A FortiGate traffic log excerpt.
pub fn fortigate() -> Vec<String> {
    [
        r#"date=2024-01-15 time=12:00:01 devname="FG-100F" devid="FG100FTK20000000" type="traffic" subtype="forward" level="notice" srcip=10.0.1.15 srcport=51234 dstip=93.184.216.34 dstport=443 proto=6 action="accept" service="HTTPS""#,
        r#"date=2024-01-15 time=12:00:03 devname="FG-100F" type="traffic" subtype="forward" srcip=10.0.1.15 srcport=53211 dstip=1.1.1.1 dstport=53 proto=17 action="accept" service="DNS""#,
        r#"date=2024-01-15 time=12:00:04 devname="FG-100F" type="traffic" subtype="local" srcip=198.51.100.9 srcport=40001 dstip=10.0.0.1 dstport=22 proto=6 action="deny" service="SSH""#,
        r#"date=2024-01-15 time=12:00:05 devname="FG-100F" type="traffic" subtype="local" srcip=198.51.100.9 srcport=40002 dstip=10.0.0.1 dstport=3389 proto=6 action="blocked""#,
        r#"date=2024-01-15 time=12:00:08 devname="FG-100F" type="traffic" subtype="forward" srcip=10.0.1.22 srcport=60000 dstip=52.96.0.10 dstport=993 proto=6 action="accept" direction="outbound""#,
        r#"date=2024-01-15 time=12:00:09 devname="FG-100F" type="event" subtype="system" level="information" logdesc="Admin login successful" action="login" srcip=10.0.1.2 dstip=10.0.0.1"#,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
