//! `/image` endpoints: metadata, dimensions, tiles, rendering settings.

use bytes::Bytes;
use minerva_api::{ChannelParams, Image, ImageDimensions, RenderingSettings, TileCoord};
use serde_json::Value;

use crate::client::MinervaClient;
use crate::error::ClientError;
use crate::request::{ApiRequest, ACCEPT};

const TILE_MEDIA_TYPE: &str = "image/jpeg";

/// `GET /image/{uuid}`
pub fn get(uuid: &str) -> ApiRequest {
    ApiRequest::get(format!("/image/{uuid}"))
}

/// `DELETE /image/{uuid}`
pub fn delete(uuid: &str) -> ApiRequest {
    ApiRequest::delete(format!("/image/{uuid}"))
}

/// `GET /image/{uuid}/dimensions`
pub fn dimensions(uuid: &str) -> ApiRequest {
    ApiRequest::get(format!("/image/{uuid}/dimensions"))
}

/// `GET /image/{uuid}/render-tile/{x}/{y}/{z}/{t}/{level}/{channels}` as JPEG.
pub fn render_tile(uuid: &str, coord: TileCoord, channels: &ChannelParams) -> ApiRequest {
    ApiRequest::get(format!(
        "/image/{uuid}/render-tile/{}/{channels}",
        coord.path_segment()
    ))
    .with_header(ACCEPT, TILE_MEDIA_TYPE)
    .binary()
}

/// `GET /image/{uuid}/prerendered-tile/{x}/{y}/{z}/{t}/{level}/{settings}` as JPEG.
pub fn prerendered_tile(uuid: &str, coord: TileCoord, rendering_settings_uuid: &str) -> ApiRequest {
    ApiRequest::get(format!(
        "/image/{uuid}/prerendered-tile/{}/{rendering_settings_uuid}",
        coord.path_segment()
    ))
    .with_header(ACCEPT, TILE_MEDIA_TYPE)
    .binary()
}

/// `POST /image/{uuid}/rendering_settings`
pub fn create_rendering_settings(uuid: &str, settings: Value) -> ApiRequest {
    ApiRequest::post(format!("/image/{uuid}/rendering_settings")).with_body(settings)
}

impl MinervaClient {
    pub async fn get_image(&self, uuid: &str) -> Result<Image, ClientError> {
        self.fetch_json(get(uuid)).await
    }

    pub async fn delete_image(&self, uuid: &str) -> Result<(), ClientError> {
        self.dispatch(delete(uuid)).await.map(drop)
    }

    pub async fn get_image_dimensions(&self, uuid: &str) -> Result<ImageDimensions, ClientError> {
        self.fetch_json(dimensions(uuid)).await
    }

    /// Fetch one JPEG tile rendered server-side with the default channel
    /// settings (`0,FFFFFF,0,1`). `z` and `t` default to `0` via
    /// [`TileCoord::new`].
    pub async fn get_image_tile(&self, uuid: &str, coord: TileCoord) -> Result<Bytes, ClientError> {
        self.get_image_tile_with_channels(uuid, coord, &ChannelParams::default())
            .await
    }

    pub async fn get_image_tile_with_channels(
        &self,
        uuid: &str,
        coord: TileCoord,
        channels: &ChannelParams,
    ) -> Result<Bytes, ClientError> {
        self.fetch_binary(render_tile(uuid, coord, channels)).await
    }

    /// Fetch one JPEG tile from a stored rendering-settings pyramid.
    pub async fn get_prerendered_image_tile(
        &self,
        uuid: &str,
        coord: TileCoord,
        rendering_settings_uuid: &str,
    ) -> Result<Bytes, ClientError> {
        self.fetch_binary(prerendered_tile(uuid, coord, rendering_settings_uuid))
            .await
    }

    /// Store rendering settings for an image. `settings` is sent unchanged;
    /// `None` when the API answers `204 No Content`.
    pub async fn create_rendering_settings(
        &self,
        uuid: &str,
        settings: Value,
    ) -> Result<Option<RenderingSettings>, ClientError> {
        self.fetch_json(create_rendering_settings(uuid, settings)).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::request::Method;

    #[test]
    fn render_tile_path_and_headers() {
        let req = render_tile("img", TileCoord::new(2, 5, 7), &ChannelParams::default());
        assert_eq!(req.path, "/image/img/render-tile/5/7/0/0/2/0,FFFFFF,0,1");
        assert!(req.binary);
        assert_eq!(
            req.headers,
            vec![("Accept".to_string(), "image/jpeg".to_string())]
        );
    }

    #[test]
    fn prerendered_tile_path() {
        let req = prerendered_tile("img", TileCoord::new(1, 0, 3).with_plane(4, 9), "rs-1");
        assert_eq!(req.path, "/image/img/prerendered-tile/0/3/4/9/1/rs-1");
        assert!(req.binary);
    }

    #[test]
    fn metadata_requests_are_json() {
        assert_eq!(get("img").path, "/image/img");
        assert!(!get("img").binary);
        assert_eq!(dimensions("img").path, "/image/img/dimensions");
        assert_eq!(delete("img").method, Method::Delete);
    }

    #[test]
    fn rendering_settings_body_passes_through() {
        let settings = json!({"channels": [{"id": 0, "color": "FF0000", "min": 0.1, "max": 0.9}]});
        let req = create_rendering_settings("img", settings.clone());
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, "/image/img/rendering_settings");
        assert_eq!(req.body, Some(settings));
    }
}
