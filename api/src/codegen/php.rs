use crate::domain::request::Request;

use super::CodeGenerator;

pub struct PhpGenerator;

fn php_string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

impl CodeGenerator for PhpGenerator {
    fn name(&self) -> &'static str {
        "PHP"
    }

    fn generate(&self, request: &Request) -> String {
        format!(
            "<?php\n\
             $ch = curl_init({url});\n\
             curl_setopt($ch, CURLOPT_CUSTOMREQUEST, '{method}');\n\
             curl_setopt($ch, CURLOPT_RETURNTRANSFER, true);\n\
             $response = curl_exec($ch);\n\
             curl_close($ch);\n\
             echo $response;\n\
             ?>",
            url = php_string(&request.url),
            method = request.method,
        )
    }
}
