use std::collections::BTreeMap;

use microapp_http::{FilePart, FormRender};

/// Picture upload used as supporting material for name, icon and category changes.
///
/// Only bmp, jpeg, jpg and png are accepted by the platform.
#[derive(Debug, Clone)]
pub struct UploadPicMaterialRequest {
    pub material_type: u32,
    pub material_file: FilePart,
}

impl FormRender for UploadPicMaterialRequest {
    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("material_type".to_owned(), self.material_type.to_string())])
    }

    fn multipart_params(&self) -> BTreeMap<String, FilePart> {
        BTreeMap::from([("material_file".to_owned(), self.material_file.clone())])
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn renders_type_and_file() {
        let request = UploadPicMaterialRequest {
            material_type: 2,
            material_file: FilePart::new("icon.png", &b"\x89PNG"[..]),
        };
        assert_eq!(request.params()["material_type"], "2");
        let files = request.multipart_params();
        assert_eq!(files["material_file"].filename(), "icon.png");
        assert_eq!(files["material_file"].content().as_ref(), b"\x89PNG");
    }
}
