use std::path::Path;

use anyhow::anyhow;

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    let data = std::fs::read(file_name)?;
    Ok(data)
}

/// Read and decode one face image, using the file extension as a format hint
/// and falling back to content sniffing.
pub async fn load_face_image(file_name: &str) -> anyhow::Result<image::DynamicImage> {
    let data = load_binary(file_name).await?;
    let format = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(image::ImageFormat::from_extension);
    let image = match format {
        Some(format) => image::load_from_memory_with_format(&data, format)?,
        None => image::load_from_memory(&data)?,
    };
    Ok(image)
}

/// Load all six cube-map faces concurrently, in +X, -X, +Y, -Y, +Z, -Z order.
///
/// Any face that fails to read or decode fails the whole load; there is no
/// partial-face fallback.
pub async fn load_cube_faces(file_names: &[&str; 6]) -> anyhow::Result<[image::DynamicImage; 6]> {
    let results =
        futures::future::join_all(file_names.iter().map(|name| load_face_image(name))).await;

    let mut faces = Vec::with_capacity(6);
    for (name, result) in file_names.iter().zip(results) {
        match result {
            Ok(image) => faces.push(image),
            Err(e) => return Err(anyhow!("cube map face {name}: {e}")),
        }
    }
    faces
        .try_into()
        .map_err(|_| anyhow!("expected exactly six cube map faces"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn write_png(name: &str, width: u32, height: u32) -> String {
        let dir = std::env::temp_dir().join("sky-ngin-loader-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn decodes_a_png_face() {
        let path = write_png("face.png", 4, 4);
        let image = futures::executor::block_on(load_face_image(&path)).unwrap();
        assert_eq!(image.dimensions(), (4, 4));
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = futures::executor::block_on(load_face_image("/definitely/not/here.png"));
        assert!(result.is_err());
    }

    #[test]
    fn a_bad_face_fails_the_whole_cube() {
        let good = write_png("good.png", 2, 2);
        let bad = write_png("bad.png", 2, 2) + ".missing";
        let names = [
            good.as_str(),
            good.as_str(),
            good.as_str(),
            bad.as_str(),
            good.as_str(),
            good.as_str(),
        ];
        let result = futures::executor::block_on(load_cube_faces(&names));
        let message = result.err().unwrap().to_string();
        assert!(message.contains(".missing"));
    }

    #[test]
    fn loads_all_six_faces_in_order() {
        let names_owned: Vec<String> = (0..6)
            .map(|i| write_png(&format!("ordered-{i}.png"), 2 + i, 2 + i))
            .collect();
        let names: [&str; 6] = std::array::from_fn(|i| names_owned[i].as_str());
        let faces = futures::executor::block_on(load_cube_faces(&names)).unwrap();
        for (i, face) in faces.iter().enumerate() {
            assert_eq!(face.dimensions(), (2 + i as u32, 2 + i as u32));
        }
    }
}
