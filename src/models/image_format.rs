//! 图片格式识别
//!
//! 只看文件开头的固定字节，不解码图片内容

/// 识别时读取的文件头长度
pub const HEADER_LEN: usize = 8;

const JPEG_MAGIC: &[u8] = &[0xff, 0xd8];
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
const BMP_MAGIC: &[u8] = &[0x42, 0x4d];
const GIF_MAGIC: &[u8] = &[0x47, 0x49, 0x46];

/// 支持的图片格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Bmp,
    Gif,
}

impl ImageFormat {
    /// 根据文件头判断图片格式
    ///
    /// 不足 8 字节的部分按 0 填充，所以只有 2 字节的 JPEG 头也能识别
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        let mut header = [0u8; HEADER_LEN];
        let len = bytes.len().min(HEADER_LEN);
        header[..len].copy_from_slice(&bytes[..len]);

        [
            (JPEG_MAGIC, ImageFormat::Jpeg),
            (PNG_MAGIC, ImageFormat::Png),
            (BMP_MAGIC, ImageFormat::Bmp),
            (GIF_MAGIC, ImageFormat::Gif),
        ]
        .into_iter()
        .find(|(magic, _)| header.starts_with(magic))
        .map(|(_, format)| format)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Gif => "gif",
        }
    }
}
