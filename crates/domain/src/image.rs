//! Turf images: opaque URLs attached to a turf, one of them primary.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{TurfId, TurfImageId};

/// An image owned by exactly one turf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurfImage {
    pub id: TurfImageId,
    pub turf_id: TurfId,
    pub url: String,
    pub name: String,
    pub is_primary: bool,
}

impl TurfImage {
    /// Build the image set for `turf_id` from an ordered URL list.
    ///
    /// Images are named `Image 1`, `Image 2`, … in list order and only the
    /// first one is primary, so a set never holds more than one primary image.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyImageUrl`] when any URL is blank.
    pub fn from_urls<S: AsRef<str>>(
        turf_id: TurfId,
        urls: &[S],
    ) -> Result<Vec<Self>, ValidationError> {
        urls.iter()
            .enumerate()
            .map(|(index, url)| {
                let url = url.as_ref().trim();
                if url.is_empty() {
                    return Err(ValidationError::EmptyImageUrl);
                }
                Ok(Self {
                    id: TurfImageId::new(),
                    turf_id,
                    url: url.to_owned(),
                    name: format!("Image {}", index + 1),
                    is_primary: index == 0,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_mark_only_first_image_as_primary() {
        let turf_id = TurfId::new();
        let images = TurfImage::from_urls(turf_id, &["a.jpg", "b.jpg", "c.jpg"]).unwrap();

        assert_eq!(images.len(), 3);
        assert!(images[0].is_primary);
        assert_eq!(images.iter().filter(|image| image.is_primary).count(), 1);
        assert!(images.iter().all(|image| image.turf_id == turf_id));
    }

    #[test]
    fn should_name_images_in_list_order() {
        let images = TurfImage::from_urls(TurfId::new(), &["a.jpg", "b.jpg"]).unwrap();
        assert_eq!(images[0].name, "Image 1");
        assert_eq!(images[1].name, "Image 2");
        assert_eq!(images[1].url, "b.jpg");
    }

    #[test]
    fn should_return_empty_set_for_no_urls() {
        let images = TurfImage::from_urls::<&str>(TurfId::new(), &[]).unwrap();
        assert!(images.is_empty());
    }

    #[test]
    fn should_reject_blank_url() {
        let result = TurfImage::from_urls(TurfId::new(), &["a.jpg", "  "]);
        assert_eq!(result, Err(ValidationError::EmptyImageUrl));
    }
}
