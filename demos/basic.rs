extern crate quickxml_to_json;
use quickxml_to_json::{xml_string_to_json, Config, JsType};

fn main() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?><a attr1="1"><b><c attr2="001">some text</c></b><d>42</d><d>4.2</d></a>"#;
    let conf = Config::new_with_defaults();
    let json = xml_string_to_json(xml, &conf);
    println!("{}", json.expect("Malformed XML"));

    let conf = Config::new_with_custom_values("", "txt", &[JsType::Int, JsType::Float]);
    let json = xml_string_to_json(xml, &conf);
    println!("{}", json.expect("Malformed XML"));
}
