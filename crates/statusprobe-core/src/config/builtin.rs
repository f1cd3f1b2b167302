//! Component registry of the production deployment

/// Five components: API, frontend, phone API, TCP ingestion and WMS tiles
pub const BUILTIN_CONFIG: &str = r#"
[statuspage]
page_id = "j9njnl3qx7d8"

[defaults]
tcp_timeout_ms = 3000
http_timeout_ms = 5000

[credentials]
location_posting = "LOCATION_POSTING_API_KEY"

[[components]]
id = "tqwvqj1jzq1x"
label = "API server"

[[components.probes]]
kind = "http"
name = "api time"
url = "https://api.routechoices.com/time/"

[[components]]
id = "8f1yqmjd83w8"
label = "Frontend server"

[[components.probes]]
kind = "http"
name = "events page"
url = "https://www.routechoices.com/events"

[[components]]
id = "ltkggcnccgwr"
label = "Phone API"

[[components.probes]]
kind = "http"
name = "location posting"
method = "post"
url = "https://api.routechoices.com/locations"
expected_status = 201
credential = "location_posting"
form = { device_id = "71588519", longitudes = "", latitudes = "", timestamps = "" }

[[components]]
id = "1v1vrvkcf0h7"
label = "TCP server"

[[components.probes]]
kind = "handshake"
name = "queclink heartbeat"
host = "routechoices.com"
port = 2002
send = { text = "+ACK:GTHBD,C30203,860201061588748,,20230202181922,FFFF$" }
expect = { text = "+SACK:GTHBD,C30203,FFFF$" }

[[components.probes]]
kind = "handshake"
name = "teltonika login"
host = "routechoices.com"
port = 2000
send = { hex = "000f333536333037303432343431303133" }
expect = { hex = "01" }

[[components]]
id = "3wy38sslv3r0"
label = "WMS server"

[[components.probes]]
kind = "http"
name = "map tile"
url = "https://wms.routechoices.com/?service=WMS&request=GetMap&layers=fhDbzlQSLho&styles=&format=image%2Fjpeg&transparent=false&version=1.1.1&width=512&height=512&srs=EPSG%3A3857&bbox=2641663.6975356913,8727274.141488286,2661231.576776697,8746842.020729292"
"#;
