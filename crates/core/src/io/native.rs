//! Native GeoTIFF reading/writing (without GDAL dependency)
//!
//! Uses the `tiff` crate for the container and handles the handful of
//! GeoTIFF tags needed to keep a band and its derived index on the same
//! grid: ModelPixelScale, ModelTiepoint, the GeoKeyDirectory EPSG keys and
//! GDAL_NODATA.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;
use tiff::ColorType;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GDAL_NODATA: u16 = 42113;

const GT_MODEL_TYPE_KEY: u16 = 1024;
const GT_RASTER_TYPE_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_KEY: u16 = 3072;
const USER_DEFINED: u32 = 32767;

/// Options for writing GeoTIFF files
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    /// Value written to the GDAL_NODATA tag, if any
    pub nodata: Option<f64>,
}

/// Read band 1 of a GeoTIFF file into a Raster
///
/// Samples are cast to `T`; values `T` cannot represent become
/// `T::default_nodata()`.
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(BufReader::new(file))
}

fn tiff_err(context: &str) -> impl Fn(tiff::TiffError) -> Error + '_ {
    move |e| Error::Other(format!("{}: {}", context, e))
}

fn cast_all<S, T>(buf: Vec<S>) -> Vec<T>
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    buf.into_iter()
        .map(|v| num_traits::cast(v).unwrap_or(T::default_nodata()))
        .collect()
}

fn decode_geotiff<T, R>(reader: R) -> Result<Raster<T>>
where
    T: RasterElement,
    R: Read + Seek,
{
    let mut decoder = Decoder::new(reader).map_err(tiff_err("TIFF decode error"))?;

    match decoder.colortype().map_err(tiff_err("Cannot read color type"))? {
        ColorType::Gray(_) => {}
        other => {
            return Err(Error::UnsupportedDataType(format!(
                "expected a single-band image, got {:?}",
                other
            )))
        }
    }

    let (width, height) = decoder
        .dimensions()
        .map_err(tiff_err("Cannot read dimensions"))?;
    let rows = height as usize;
    let cols = width as usize;

    let data: Vec<T> = match decoder
        .read_image()
        .map_err(tiff_err("Cannot read image data"))?
    {
        DecodingResult::U8(buf) => cast_all(buf),
        DecodingResult::U16(buf) => cast_all(buf),
        DecodingResult::U32(buf) => cast_all(buf),
        DecodingResult::I8(buf) => cast_all(buf),
        DecodingResult::I16(buf) => cast_all(buf),
        DecodingResult::I32(buf) => cast_all(buf),
        DecodingResult::F32(buf) => cast_all(buf),
        DecodingResult::F64(buf) => cast_all(buf),
        _ => {
            return Err(Error::UnsupportedDataType(
                "Unsupported TIFF pixel format".to_string(),
            ))
        }
    };

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Some(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }
    raster.set_crs(read_crs(&mut decoder));
    raster.set_nodata(read_nodata(&mut decoder));

    Ok(raster)
}

/// GeoTransform from ModelPixelScale + ModelTiepoint
fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE))
        .ok()?;
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_TIEPOINT))
        .ok()?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }

    // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
    Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]))
}

/// EPSG code from the GeoKeyDirectory (projected key wins over geographic)
fn read_crs<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<CRS> {
    let dir = decoder
        .get_tag_u32_vec(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY))
        .ok()?;
    let header = dir.get(..4)?;
    let num_keys = header[3] as usize;

    let mut geographic = None;
    for entry in dir[4..].chunks_exact(4).take(num_keys) {
        let (key_id, location, value) = (entry[0], entry[1], entry[3]);
        // location != 0 means the value lives in another tag
        if location != 0 || value == 0 || value == USER_DEFINED {
            continue;
        }
        match key_id as u16 {
            PROJECTED_CS_TYPE_KEY => return Some(CRS::from_epsg(value)),
            GEOGRAPHIC_TYPE_KEY => geographic = Some(CRS::from_epsg(value)),
            _ => {}
        }
    }
    geographic
}

fn read_nodata<T: RasterElement, R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<T> {
    let text = decoder
        .get_tag_ascii_string(Tag::from_u16_exhaustive(GDAL_NODATA))
        .ok()?;
    let value: f64 = text.trim_end_matches('\0').trim().parse().ok()?;
    num_traits::cast(value)
}

/// Write a Raster to a single-band float32 GeoTIFF file
///
/// The transform must be north-up: it is stored as pixel scale + tiepoint.
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P, options: Option<GeoTiffOptions>) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    encode_geotiff(raster, &mut writer, &options.unwrap_or_default())?;
    writer.flush()?;
    Ok(())
}

fn geokey_directory(crs: Option<&CRS>) -> Vec<u16> {
    let epsg = crs.and_then(|c| {
        u16::try_from(c.epsg())
            .ok()
            .map(|code| (code, c.is_geographic()))
    });

    // Keys must be sorted by id
    let mut keys: Vec<[u16; 4]> = vec![
        // GTModelType: 1 = projected, 2 = geographic
        [GT_MODEL_TYPE_KEY, 0, 1, if matches!(epsg, Some((_, true))) { 2 } else { 1 }],
        // GTRasterType: 1 = PixelIsArea
        [GT_RASTER_TYPE_KEY, 0, 1, 1],
    ];
    match epsg {
        Some((code, true)) => keys.push([GEOGRAPHIC_TYPE_KEY, 0, 1, code]),
        Some((code, false)) => keys.push([PROJECTED_CS_TYPE_KEY, 0, 1, code]),
        None => {}
    }

    let mut dir = vec![1, 1, 0, keys.len() as u16];
    dir.extend(keys.iter().flatten());
    dir
}

fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W, options: &GeoTiffOptions) -> Result<()>
where
    T: RasterElement,
    W: Write + Seek,
{
    let gt = raster.transform();
    if !gt.is_north_up() {
        return Err(Error::Other(
            "only north-up transforms can be written as pixel scale + tiepoint".into(),
        ));
    }

    let mut encoder = TiffEncoder::new(writer).map_err(tiff_err("TIFF encoder error"))?;
    let (rows, cols) = raster.shape();

    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .map_err(tiff_err("Cannot create TIFF image"))?;

    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE), &scale[..])
        .map_err(tiff_err("Cannot write scale tag"))?;

    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(MODEL_TIEPOINT), &tiepoint[..])
        .map_err(tiff_err("Cannot write tiepoint tag"))?;

    let geokeys = geokey_directory(raster.crs());
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY), geokeys.as_slice())
        .map_err(tiff_err("Cannot write geokey tag"))?;

    if let Some(nodata) = options.nodata {
        let text = nodata.to_string();
        image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(GDAL_NODATA), text.as_str())
            .map_err(tiff_err("Cannot write nodata tag"))?;
    }

    image
        .write_data(&data)
        .map_err(tiff_err("Cannot write image data"))?;

    Ok(())
}
