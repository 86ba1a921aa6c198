//! Gauss–Krüger (transverse Mercator) projection for national grids.
//!
//! The series expansions follow the formulas published by Lantmäteriet for
//! the Swedish grids; they are accurate to well below a millimeter inside the
//! projection zone.

use once_cell::sync::Lazy;

/// Ellipsoid and projection parameters of a Gauss–Krüger grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussKruger {
    /// Semi-major axis in meters
    pub axis: f64,
    pub flattening: f64,
    /// Central meridian in degrees
    pub central_meridian: f64,
    pub scale: f64,
    pub false_northing: f64,
    pub false_easting: f64,
}

/// RT90 2.5 gon V on GRS80, the grid used for regional coordinates.
pub static RT90_2_5_GON_V: Lazy<GaussKruger> = Lazy::new(|| GaussKruger {
    axis: 6_378_137.0,
    flattening: 1.0 / 298.257_222_101,
    central_meridian: 15.0 + 48.0 / 60.0 + 22.624_306 / 3600.0,
    scale: 1.000_005_610_24,
    false_northing: -667.711,
    false_easting: 1_500_064.274,
});

impl GaussKruger {
    fn n(&self) -> f64 {
        self.flattening / (2.0 - self.flattening)
    }

    fn e2(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    fn a_roof(&self) -> f64 {
        let n = self.n();
        self.axis / (1.0 + n) * (1.0 + n * n / 4.0 + n.powi(4) / 64.0)
    }

    /// Projects geodetic latitude/longitude (degrees) to `(northing, easting)`.
    pub fn geodetic_to_grid(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let e2 = self.e2();
        let n = self.n();
        let a_roof = self.a_roof();

        let a = e2;
        let b = (5.0 * e2 * e2 - e2.powi(3)) / 6.0;
        let c = (104.0 * e2.powi(3) - 45.0 * e2.powi(4)) / 120.0;
        let d = (1237.0 * e2.powi(4)) / 1260.0;

        let beta1 = n / 2.0 - 2.0 * n * n / 3.0 + 5.0 * n.powi(3) / 16.0 + 41.0 * n.powi(4) / 180.0;
        let beta2 = 13.0 * n * n / 48.0 - 3.0 * n.powi(3) / 5.0 + 557.0 * n.powi(4) / 1440.0;
        let beta3 = 61.0 * n.powi(3) / 240.0 - 103.0 * n.powi(4) / 140.0;
        let beta4 = 49561.0 * n.powi(4) / 161_280.0;

        let phi = latitude.to_radians();
        let delta_lambda = (longitude - self.central_meridian).to_radians();

        let sin_phi = phi.sin();
        let phi_star = phi
            - sin_phi
                * phi.cos()
                * (a + b * sin_phi.powi(2) + c * sin_phi.powi(4) + d * sin_phi.powi(6));

        let xi_prim = (phi_star.tan() / delta_lambda.cos()).atan();
        let eta_prim = (phi_star.cos() * delta_lambda.sin()).atanh();

        let northing = self.scale
            * a_roof
            * (xi_prim
                + beta1 * (2.0 * xi_prim).sin() * (2.0 * eta_prim).cosh()
                + beta2 * (4.0 * xi_prim).sin() * (4.0 * eta_prim).cosh()
                + beta3 * (6.0 * xi_prim).sin() * (6.0 * eta_prim).cosh()
                + beta4 * (8.0 * xi_prim).sin() * (8.0 * eta_prim).cosh())
            + self.false_northing;

        let easting = self.scale
            * a_roof
            * (eta_prim
                + beta1 * (2.0 * xi_prim).cos() * (2.0 * eta_prim).sinh()
                + beta2 * (4.0 * xi_prim).cos() * (4.0 * eta_prim).sinh()
                + beta3 * (6.0 * xi_prim).cos() * (6.0 * eta_prim).sinh()
                + beta4 * (8.0 * xi_prim).cos() * (8.0 * eta_prim).sinh())
            + self.false_easting;

        (northing, easting)
    }

    /// Inverse projection: `(northing, easting)` to `(latitude, longitude)` in degrees.
    pub fn grid_to_geodetic(&self, northing: f64, easting: f64) -> (f64, f64) {
        let e2 = self.e2();
        let n = self.n();
        let a_roof = self.a_roof();

        let delta1 = n / 2.0 - 2.0 * n * n / 3.0 + 37.0 * n.powi(3) / 96.0 - n.powi(4) / 360.0;
        let delta2 = n * n / 48.0 + n.powi(3) / 15.0 - 437.0 * n.powi(4) / 1440.0;
        let delta3 = 17.0 * n.powi(3) / 480.0 - 37.0 * n.powi(4) / 840.0;
        let delta4 = 4397.0 * n.powi(4) / 161_280.0;

        let a_star = e2 + e2 * e2 + e2.powi(3) + e2.powi(4);
        let b_star = -(7.0 * e2 * e2 + 17.0 * e2.powi(3) + 30.0 * e2.powi(4)) / 6.0;
        let c_star = (224.0 * e2.powi(3) + 889.0 * e2.powi(4)) / 120.0;
        let d_star = -(4279.0 * e2.powi(4)) / 1260.0;

        let xi = (northing - self.false_northing) / (self.scale * a_roof);
        let eta = (easting - self.false_easting) / (self.scale * a_roof);

        let xi_prim = xi
            - delta1 * (2.0 * xi).sin() * (2.0 * eta).cosh()
            - delta2 * (4.0 * xi).sin() * (4.0 * eta).cosh()
            - delta3 * (6.0 * xi).sin() * (6.0 * eta).cosh()
            - delta4 * (8.0 * xi).sin() * (8.0 * eta).cosh();
        let eta_prim = eta
            - delta1 * (2.0 * xi).cos() * (2.0 * eta).sinh()
            - delta2 * (4.0 * xi).cos() * (4.0 * eta).sinh()
            - delta3 * (6.0 * xi).cos() * (6.0 * eta).sinh()
            - delta4 * (8.0 * xi).cos() * (8.0 * eta).sinh();

        let phi_star = (xi_prim.sin() / eta_prim.cosh()).asin();
        let delta_lambda = (eta_prim.sinh() / xi_prim.cos()).atan();

        let sin_star = phi_star.sin();
        let phi = phi_star
            + sin_star
                * phi_star.cos()
                * (a_star
                    + b_star * sin_star.powi(2)
                    + c_star * sin_star.powi(4)
                    + d_star * sin_star.powi(6));

        (
            phi.to_degrees(),
            self.central_meridian + delta_lambda.to_degrees(),
        )
    }
}
